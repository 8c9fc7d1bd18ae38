//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! centinela status config.yaml
//! centinela status config.yaml --format json
//! centinela check config.yaml --fail-on-drift
//! centinela validate config.yaml
//! ```

mod core;

pub use self::core::{parse_args, CheckArgs, Cli, Command, OutputFormat, StatusArgs, ValidateArgs};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_status_command() {
        let cli = parse_args(["centinela", "status", "config.yaml"]).unwrap();
        match cli.command {
            Command::Status(args) => {
                assert_eq!(args.config, PathBuf::from("config.yaml"));
                assert_eq!(args.format, OutputFormat::Text);
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_config_defaults_to_config_yaml() {
        let cli = parse_args(["centinela", "validate"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Validate(ValidateArgs { config: PathBuf::from("config.yaml") })
        );
    }

    #[test]
    fn test_parse_check_with_flags() {
        let cli = parse_args(["centinela", "-q", "check", "prod.yaml", "--fail-on-drift"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.config, PathBuf::from("prod.yaml"));
                assert!(args.fail_on_drift);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_parse_json_format() {
        let cli = parse_args(["centinela", "status", "--format", "json"]).unwrap();
        match cli.command {
            Command::Status(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(parse_args(["centinela", "status", "--format", "xml"]).is_err());
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_missing_subcommand_rejected() {
        assert!(parse_args(["centinela"]).is_err());
    }
}
