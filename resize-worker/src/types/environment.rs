//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use media_storage::event_queue::QueueConfig;

/// Default size specifications applied when `MAX_SIZES` is unset
const DEFAULT_SIZE_SPECS: &str = "150x300,500x600";

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket name holding origin uploads and derivatives
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside
    /// of development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "cdn-media-dev".to_string())
            }
        }
    }

    /// Returns the URL of the queue receiving bucket creation events
    ///
    /// # Panics
    ///
    /// Panics if the `RESIZE_QUEUE_URL` environment variable is not set outside
    /// of development
    #[must_use]
    pub fn resize_queue_url(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("RESIZE_QUEUE_URL")
                .expect("RESIZE_QUEUE_URL environment variable is not set"),
            Self::Development => env::var("RESIZE_QUEUE_URL").unwrap_or_else(|_| {
                "http://localhost:4566/000000000000/media-resize-events".to_string()
            }),
        }
    }

    /// Whether derivative generation is enabled
    ///
    /// Defaults to enabled; set `ENABLE_IMAGE_RESIZE=false` to turn the
    /// worker into a no-op.
    #[must_use]
    pub fn resizing_enabled(&self) -> bool {
        env::var("ENABLE_IMAGE_RESIZE").map_or(true, |v| v.trim().to_lowercase() != "false")
    }

    /// Returns the configured size specifications, unparsed
    ///
    /// `MAX_SIZES` is a comma-separated list of `WxH` entries. Entries are
    /// validated at use, not here: a malformed entry must only skip itself.
    #[must_use]
    pub fn size_specs(&self) -> Vec<String> {
        env::var("MAX_SIZES")
            .unwrap_or_else(|_| DEFAULT_SIZE_SPECS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// AWS SQS service configuration
    pub async fn sqs_client_config(&self) -> aws_sdk_sqs::Config {
        let aws_config = self.aws_config().await;
        (&aws_config).into()
    }

    /// Polling configuration for the creation-event queue
    #[must_use]
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            queue_url: self.resize_queue_url(),
            max_messages: 10,
            visibility_timeout: 60,
            wait_time_seconds: 20,
        }
    }
}
