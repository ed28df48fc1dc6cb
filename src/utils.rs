use time::macros::format_description;
use tracing_subscriber::{fmt::time::LocalTime, EnvFilter};

/// `RUST_LOG` wins when set; otherwise `info` when verbose and `warn` when not.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .try_init();
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if args.cache_capacity == 0 {
        anyhow::bail!("--cache-capacity must be greater than 0");
    }

    if let Some(timeout) = args.read_timeout_secs {
        if timeout == 0 {
            anyhow::bail!("--read-timeout-secs must be greater than 0");
        }
    }

    if let Some(range) = &args.range {
        if range.len() != 2 {
            anyhow::bail!("--range expects exactly two dates");
        }
    }

    Ok(())
}
