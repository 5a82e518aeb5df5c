use std::time::{SystemTime, UNIX_EPOCH};

use banglelink_proto::TimeSync;

use crate::cmd::TimeArgs;
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_time, OutputFormat};

/// No civil time zone is more than 14 hours from UTC.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

pub fn run(args: TimeArgs, format: OutputFormat) -> CliResult<i32> {
    let sync = resolve(&args)?;
    print_time(&sync, format);
    Ok(SUCCESS)
}

fn resolve(args: &TimeArgs) -> CliResult<TimeSync> {
    if args.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(CliError::new(
            USAGE,
            format!(
                "--utc-offset-minutes {} is outside -{MAX_OFFSET_MINUTES}..={MAX_OFFSET_MINUTES}",
                args.utc_offset_minutes
            ),
        ));
    }
    let unix_seconds = match args.unix_seconds {
        Some(secs) => secs,
        None => now_unix_seconds()?,
    };
    Ok(TimeSync {
        unix_seconds,
        utc_offset_minutes: args.utc_offset_minutes,
    })
}

fn now_unix_seconds() -> CliResult<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| CliError::new(INTERNAL, format!("system clock before epoch: {err}")))?;
    Ok(i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_pass_through() {
        let sync = resolve(&TimeArgs {
            unix_seconds: Some(1_700_000_000),
            utc_offset_minutes: -300,
        })
        .unwrap();
        assert_eq!(sync.unix_seconds, 1_700_000_000);
        assert_eq!(sync.offset_hours(), "-5");
    }

    #[test]
    fn defaults_to_now() {
        let sync = resolve(&TimeArgs {
            unix_seconds: None,
            utc_offset_minutes: 0,
        })
        .unwrap();
        assert!(sync.unix_seconds > 1_600_000_000);
    }

    #[test]
    fn rejects_impossible_offset() {
        let err = resolve(&TimeArgs {
            unix_seconds: Some(0),
            utc_offset_minutes: 15 * 60,
        })
        .unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
