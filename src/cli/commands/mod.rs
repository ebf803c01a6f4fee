pub mod logging;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("tessera")
        .about("Session authentication and route authorization")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("TESSERA_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = session::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::session::{
        ARG_COOKIE_SECURE, ARG_CREDENTIALS_FILE, ARG_SESSION_TTL_SECONDS, ARG_SIGNING_KEY,
    };
    use super::*;
    use std::path::PathBuf;

    const ENV_VARS: [&str; 6] = [
        "TESSERA_PORT",
        "TESSERA_SIGNING_KEY",
        "TESSERA_CREDENTIALS_FILE",
        "TESSERA_SESSION_TTL_SECONDS",
        "TESSERA_COOKIE_SECURE",
        "TESSERA_LOG_LEVEL",
    ];

    fn unset_all() -> Vec<(&'static str, Option<&'static str>)> {
        ENV_VARS.iter().map(|name| (*name, None)).collect()
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "tessera");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Session authentication and route authorization".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(unset_all(), || {
            let matches = new().get_matches_from(vec!["tessera"]);

            assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
            assert!(matches.get_one::<String>(ARG_SIGNING_KEY).is_none());
            assert!(matches.get_one::<PathBuf>(ARG_CREDENTIALS_FILE).is_none());
            assert!(matches.get_one::<u64>(ARG_SESSION_TTL_SECONDS).is_none());
            assert!(!matches.get_flag(ARG_COOKIE_SECURE));
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(0)
            );
        });
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars(unset_all(), || {
            let matches = new().get_matches_from(vec![
                "tessera",
                "--port",
                "9090",
                "--signing-key",
                "0123456789abcdef0123456789abcdef",
                "--credentials-file",
                "/etc/tessera/users.json",
                "--session-ttl-seconds",
                "3600",
                "--cookie-secure",
            ]);

            assert_eq!(matches.get_one::<u16>("port").copied(), Some(9090));
            assert_eq!(
                matches.get_one::<String>(ARG_SIGNING_KEY).cloned(),
                Some("0123456789abcdef0123456789abcdef".to_string())
            );
            assert_eq!(
                matches.get_one::<PathBuf>(ARG_CREDENTIALS_FILE).cloned(),
                Some(PathBuf::from("/etc/tessera/users.json"))
            );
            assert_eq!(
                matches.get_one::<u64>(ARG_SESSION_TTL_SECONDS).copied(),
                Some(3600)
            );
            assert!(matches.get_flag(ARG_COOKIE_SECURE));
        });
    }

    #[test]
    fn test_check_env() {
        let mut vars = unset_all();
        vars.retain(|(name, _)| {
            !matches!(
                *name,
                "TESSERA_PORT" | "TESSERA_SIGNING_KEY" | "TESSERA_SESSION_TTL_SECONDS"
            )
        });
        vars.push(("TESSERA_PORT", Some("443")));
        vars.push(("TESSERA_SIGNING_KEY", Some("env-signing-key-0123456789")));
        vars.push(("TESSERA_SESSION_TTL_SECONDS", Some("60")));

        temp_env::with_vars(vars, || {
            let matches = new().get_matches_from(vec!["tessera"]);

            assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
            assert_eq!(
                matches.get_one::<String>(ARG_SIGNING_KEY).cloned(),
                Some("env-signing-key-0123456789".to_string())
            );
            assert_eq!(
                matches.get_one::<u64>(ARG_SESSION_TTL_SECONDS).copied(),
                Some(60)
            );
        });
    }

    #[test]
    fn test_zero_ttl_rejected() {
        temp_env::with_vars(unset_all(), || {
            let result =
                new().try_get_matches_from(vec!["tessera", "--session-ttl-seconds", "0"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_invalid_port_rejected() {
        temp_env::with_vars(unset_all(), || {
            let result = new().try_get_matches_from(vec!["tessera", "--port", "70000"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_verbosity_count() {
        temp_env::with_vars(unset_all(), || {
            let matches = new().get_matches_from(vec!["tessera", "-vvv"]);
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(3)
            );
        });
    }

    #[test]
    fn test_blank_signing_key_rejected() {
        temp_env::with_vars(unset_all(), || {
            let matches = new().get_matches_from(vec!["tessera", "--signing-key", "   "]);
            let result = session::Options::parse(&matches);
            assert!(result.is_err());
        });
    }
}
