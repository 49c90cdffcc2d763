use clap::Parser;

/// Babelterm: terminal client for a self-hosted multi-provider translation server
#[derive(Parser, Debug, Clone)]
#[command(name = "babelterm")]
#[command(version)]
#[command(about = "Terminal client for a self-hosted translation server", long_about = None)]
pub struct Cli {
    /// Base URL of the translation server.
    #[arg(long, env = "BABELTERM_SERVER", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Target language for this session. Overrides the persisted choice
    /// until a language is picked in-app.
    #[arg(long, value_name = "CODE")]
    pub target_lang: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["babelterm"]);
        assert_eq!(cli.server, "http://127.0.0.1:3000");
        assert!(cli.target_lang.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_server_flag() {
        let cli = Cli::parse_from(["babelterm", "--server", "http://10.0.0.2:8080"]);
        assert_eq!(cli.server, "http://10.0.0.2:8080");
    }

    #[test]
    fn test_target_lang_flag() {
        let cli = Cli::parse_from(["babelterm", "--target-lang", "de"]);
        assert_eq!(cli.target_lang.as_deref(), Some("de"));
    }
}
