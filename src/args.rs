use clap::Parser;

use crate::util::env::Env;

/// Progress-tracking API backed by in-memory sample data.
///
/// Flags take precedence over the matching environment variables.
#[derive(Parser, Debug, Default)]
#[command(version)]
pub struct Cli {
    /// Port to listen on (SERVER_API_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Seed for the generated activity history (SEED)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Artificial delay for the mock analysis endpoint, in milliseconds (ANALYSIS_DELAY_MS)
    #[arg(long)]
    pub analysis_delay_ms: Option<u64>,
}

impl Cli {
    pub fn apply(&self, env: &mut Env) {
        if let Some(port) = self.port {
            env.server_api_port = port;
        }
        if let Some(seed) = self.seed {
            env.seed = seed;
        }
        if let Some(delay) = self.analysis_delay_ms {
            env.analysis_delay_ms = delay;
        }
    }
}

pub fn parse_cli_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::env;

    #[test]
    fn test_flags_override_env() {
        let mut env: Env = env::from_iter(vec![("SEED".to_string(), "3".to_string())]).unwrap();
        let cli = Cli::try_parse_from([
            "momentum-api",
            "--port",
            "8080",
            "--analysis-delay-ms",
            "0",
        ])
        .unwrap();

        cli.apply(&mut env);

        assert_eq!(env.server_api_port, 8080);
        assert_eq!(env.analysis_delay_ms, 0);
        assert_eq!(env.seed, 3);
    }

    #[test]
    fn test_no_flags_keep_env() {
        let mut env: Env = env::from_iter(Vec::new()).unwrap();
        let before = env.clone();

        Cli::default().apply(&mut env);
        assert_eq!(env, before);
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["momentum-api", "--port", "99999"]).is_err());
    }
}
