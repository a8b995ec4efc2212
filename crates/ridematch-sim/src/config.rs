use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use ridematch::{OrphanPolicy, RideKind, SystemConfig};

/// Output format of the completed-ride report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One block per ride, human readable.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Runtime configuration for the `ridematch-sim` binary.
///
/// All values are parsed from CLI arguments or environment variables. The
/// defaults reproduce the reference scenario: three workers, five riders, five
/// drivers, four seconds to settle, then shutdown.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ridematch-sim",
    version,
    about = "Match synthetic riders with drivers and report the completed rides"
)]
pub struct CliArgs {
    /// Number of concurrent matcher tasks.
    ///
    /// Environment variable: `WORKER_THREADS`
    #[arg(long, env = "WORKER_THREADS", default_value_t = 3)]
    pub worker_threads: usize,

    /// Number of riders to enqueue.
    ///
    /// Environment variable: `RIDERS`
    #[arg(long, env = "RIDERS", default_value_t = 5)]
    pub riders: usize,

    /// Number of drivers to enqueue, after all riders.
    ///
    /// Environment variable: `DRIVERS`
    #[arg(long, env = "DRIVERS", default_value_t = 5)]
    pub drivers: usize,

    /// How long to let the workers match before shutting down, in
    /// milliseconds.
    ///
    /// Environment variable: `SETTLE_MS`
    #[arg(long, env = "SETTLE_MS", default_value_t = 4_000)]
    pub settle_ms: u64,

    /// Simulated dispatch work per match, in milliseconds.
    ///
    /// Environment variable: `PROCESSING_DELAY_MS`
    #[arg(long, env = "PROCESSING_DELAY_MS", default_value_t = 500)]
    pub processing_delay_ms: u64,

    /// Upper bound on the shutdown wait, in milliseconds.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT_MS`
    #[arg(long, env = "SHUTDOWN_TIMEOUT_MS", default_value_t = 3_000)]
    pub shutdown_timeout_ms: u64,

    /// Fate of a rider held by a worker when shutdown arrives first:
    /// `drop` or `requeue`.
    ///
    /// Environment variable: `ORPHAN_POLICY`
    #[arg(long, env = "ORPHAN_POLICY", default_value_t = OrphanPolicy::Drop)]
    pub orphan_policy: OrphanPolicy,

    /// Service level of every synthesised ride: `standard` or `premium`.
    ///
    /// Environment variable: `RIDE_KIND`
    #[arg(long, env = "RIDE_KIND", default_value_t = RideKind::Standard)]
    pub ride_kind: RideKind,

    /// Rating given to every driver, from 1 to 5.
    ///
    /// Environment variable: `DRIVER_RATING`
    #[arg(long, env = "DRIVER_RATING", default_value_t = 5)]
    pub driver_rating: u8,

    /// Report format.
    ///
    /// Environment variable: `REPORT_FORMAT`
    #[arg(long, env = "REPORT_FORMAT", value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub system: SystemConfig,
    pub riders: usize,
    pub drivers: usize,
    pub driver_rating: u8,
    pub settle: Duration,
    pub format: ReportFormat,
}

impl TryFrom<CliArgs> for SimConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.worker_threads == 0 {
            bail!("WORKER_THREADS must be greater than 0");
        }

        if args.shutdown_timeout_ms == 0 {
            bail!("SHUTDOWN_TIMEOUT_MS must be greater than 0");
        }

        if !(1..=5).contains(&args.driver_rating) {
            bail!("DRIVER_RATING must be between 1 and 5");
        }

        let system = SystemConfig::new(args.worker_threads)
            .with_processing_delay(Duration::from_millis(args.processing_delay_ms))
            .with_shutdown_timeout(Duration::from_millis(args.shutdown_timeout_ms))
            .with_orphan_policy(args.orphan_policy)
            .with_ride_kind(args.ride_kind);
        system.validate()?;

        Ok(Self {
            system,
            riders: args.riders,
            drivers: args.drivers,
            driver_rating: args.driver_rating,
            settle: Duration::from_millis(args.settle_ms),
            format: args.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// The reference scenario, built without consulting the environment.
    fn reference_args() -> CliArgs {
        CliArgs {
            worker_threads: 3,
            riders: 5,
            drivers: 5,
            settle_ms: 4_000,
            processing_delay_ms: 500,
            shutdown_timeout_ms: 3_000,
            orphan_policy: OrphanPolicy::Drop,
            ride_kind: RideKind::Standard,
            driver_rating: 5,
            format: ReportFormat::Text,
        }
    }

    fn default_of(id: &str) -> String {
        let command = CliArgs::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id().as_str() == id)
            .unwrap_or_else(|| panic!("no argument `{id}`"));
        arg.get_default_values()
            .iter()
            .map(|value| value.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn declared_defaults_match_reference_scenario() {
        assert_eq!(default_of("worker_threads"), "3");
        assert_eq!(default_of("riders"), "5");
        assert_eq!(default_of("drivers"), "5");
        assert_eq!(default_of("settle_ms"), "4000");
        assert_eq!(default_of("processing_delay_ms"), "500");
        assert_eq!(default_of("shutdown_timeout_ms"), "3000");
        assert_eq!(default_of("orphan_policy"), "drop");
        assert_eq!(default_of("ride_kind"), "standard");
        assert_eq!(default_of("driver_rating"), "5");
        assert_eq!(default_of("format"), "text");
    }

    #[test]
    fn reference_args_build_reference_config() {
        let config = SimConfig::try_from(reference_args()).unwrap();
        assert_eq!(config.system.worker_threads, 3);
        assert_eq!(config.riders, 5);
        assert_eq!(config.drivers, 5);
        assert_eq!(config.driver_rating, 5);
        assert_eq!(config.settle, Duration::from_secs(4));
        assert_eq!(config.system.processing_delay, Duration::from_millis(500));
        assert_eq!(config.system.shutdown_timeout, Duration::from_secs(3));
        assert_eq!(config.system.orphan_policy, OrphanPolicy::Drop);
        assert_eq!(config.system.ride_kind, RideKind::Standard);
        assert_eq!(config.format, ReportFormat::Text);
    }

    #[test]
    fn flags_are_parsed() {
        let args = CliArgs::try_parse_from([
            "ridematch-sim",
            "--worker-threads",
            "8",
            "--riders",
            "6",
            "--drivers",
            "4",
            "--settle-ms",
            "100",
            "--processing-delay-ms",
            "0",
            "--shutdown-timeout-ms",
            "250",
            "--orphan-policy",
            "requeue",
            "--ride-kind",
            "premium",
            "--driver-rating",
            "4",
            "--format",
            "json",
        ])
        .unwrap();
        let config = SimConfig::try_from(args).unwrap();
        assert_eq!(config.system.worker_threads, 8);
        assert_eq!(config.riders, 6);
        assert_eq!(config.drivers, 4);
        assert_eq!(config.settle, Duration::from_millis(100));
        assert_eq!(config.system.processing_delay, Duration::ZERO);
        assert_eq!(config.system.shutdown_timeout, Duration::from_millis(250));
        assert_eq!(config.system.orphan_policy, OrphanPolicy::Requeue);
        assert_eq!(config.system.ride_kind, RideKind::Premium);
        assert_eq!(config.driver_rating, 4);
        assert_eq!(config.format, ReportFormat::Json);
    }

    #[test]
    fn unknown_ride_kind_is_rejected() {
        assert!(CliArgs::try_parse_from(["ridematch-sim", "--ride-kind", "luxury"]).is_err());
    }

    #[test]
    fn zero_workers_is_rejected() {
        let args = CliArgs {
            worker_threads: 0,
            ..reference_args()
        };
        let err = SimConfig::try_from(args).unwrap_err();
        assert!(err.to_string().contains("WORKER_THREADS"));
    }

    #[test]
    fn zero_shutdown_timeout_is_rejected() {
        let args = CliArgs {
            shutdown_timeout_ms: 0,
            ..reference_args()
        };
        assert!(SimConfig::try_from(args).is_err());
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        for rating in [0, 6] {
            let args = CliArgs {
                driver_rating: rating,
                ..reference_args()
            };
            assert!(SimConfig::try_from(args).is_err());
        }
    }
}
