//! CLI argument parsing and validation.

mod args;

pub use args::Args;

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["phototale"]).unwrap();

        assert_eq!(args.image, PathBuf::from("test-images/mock_interview.jpg"));
        assert_eq!(args.describe, None);
        assert_eq!(args.endpoint, None);
        assert!(!args.verbose);
    }

    #[test]
    fn test_positional_image() {
        let args = Args::try_parse_from(["phototale", "photos/cat.png"]).unwrap();
        assert_eq!(args.image, PathBuf::from("photos/cat.png"));
    }

    #[test]
    fn test_describe_flag() {
        let args =
            Args::try_parse_from(["phototale", "-d", "a rainy day"]).unwrap();
        assert_eq!(args.describe.as_deref(), Some("a rainy day"));
    }

    #[test]
    fn test_endpoint_override() {
        let args = Args::try_parse_from([
            "phototale",
            "--endpoint",
            "http://localhost:8081",
        ])
        .unwrap();
        assert_eq!(args.endpoint.as_deref(), Some("http://localhost:8081"));
    }

    #[test]
    fn test_verbose_flag() {
        let args = Args::try_parse_from(["phototale", "-v"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Args::try_parse_from(["phototale", "--speed", "2.0"]).is_err());
    }
}
