//! Wrapper script the submitted code runs inside.

use evalbot_core::config::HarnessConfig;

/// Activates the sandbox virtualenv, then runs the code and prints the
/// traceback of anything it raises.
pub const DEFAULT_TEMPLATE: &str = r#"
venv_file = "{VENV}"
exec(open(venv_file).read(), dict(__file__=venv_file))

try:
{CODE}
except:
    import traceback
    print(traceback.format_exc())
"#;

const CODE_INDENT: &str = "    ";

#[derive(Debug, Clone)]
pub struct Harness {
    template: String,
}

impl Harness {
    /// `template` must contain `{CODE}`; `{VENV}` is replaced with `venv_activate`.
    pub fn new(template: Option<&str>, venv_activate: &str) -> Self {
        Self {
            template: template
                .unwrap_or(DEFAULT_TEMPLATE)
                .replace("{VENV}", venv_activate),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.template.as_deref(), &config.venv_activate)
    }

    /// Indent `code` into the `try:` body of the template.
    pub fn wrap(&self, code: &str) -> String {
        self.template.replace("{CODE}", &indent(code, CODE_INDENT))
    }
}

/// Prefix every line that has non-whitespace content.
pub fn indent(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
