use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use tracing::warn;

use super::{FatalErrorKind, RawSecret, SecretStore, StoreError, StoreOutcome};

/// Resolves secrets from AWS Secrets Manager.
///
/// Each [`fetch`](SecretStore::fetch) issues exactly one `GetSecretValue`
/// call. Fatal service errors propagate; any other failure reported by the
/// service is logged once and collapsed into [`StoreOutcome::NotFound`].
pub struct SecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerStore {
    /// Creates a store using the ambient AWS configuration (env vars,
    /// instance profile, etc.) already loaded by `aws_config::load_from_env`.
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_secretsmanager::Client::new(config),
        }
    }

    pub fn from_client(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl SecretStore for SecretsManagerStore {
    async fn fetch(&self, name: &str) -> Result<StoreOutcome, StoreError> {
        let result = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await;

        match result {
            Ok(output) => {
                let raw = RawSecret {
                    string: output.secret_string().map(str::to_string),
                    binary: output.secret_binary().map(|b| b.as_ref().to_vec()),
                };
                if raw.string.is_none() && raw.binary.is_none() {
                    Ok(StoreOutcome::NotFound)
                } else {
                    Ok(StoreOutcome::Found(raw))
                }
            }
            Err(err) => {
                if let Some(kind) = err.as_service_error().and_then(classify_fatal) {
                    return Err(StoreError::Fatal {
                        name: name.to_string(),
                        kind,
                    });
                }
                if err.as_service_error().is_some() {
                    warn!(
                        secret = name,
                        error = %DisplayErrorContext(&err),
                        "secret store returned an error, treating secret as absent"
                    );
                    return Ok(StoreOutcome::NotFound);
                }
                // The request never reached the store; not ours to classify.
                Err(StoreError::Request {
                    name: name.to_string(),
                    source: Box::new(err),
                })
            }
        }
    }
}

/// Maps a service error onto the fatal set, or `None` if it is benign.
fn classify_fatal(err: &GetSecretValueError) -> Option<FatalErrorKind> {
    match err {
        GetSecretValueError::DecryptionFailure(_) => Some(FatalErrorKind::DecryptionFailure),
        GetSecretValueError::InternalServiceError(_) => Some(FatalErrorKind::InternalServiceError),
        GetSecretValueError::InvalidParameterException(_) => Some(FatalErrorKind::InvalidParameter),
        GetSecretValueError::InvalidRequestException(_) => Some(FatalErrorKind::InvalidRequest),
        GetSecretValueError::ResourceNotFoundException(_) => Some(FatalErrorKind::ResourceNotFound),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_secretsmanager::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_secretsmanager::types::error::{
        DecryptionFailure, InternalServiceError, InvalidParameterException,
        InvalidRequestException, ResourceNotFoundException,
    };
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Builds a store whose HTTP layer replays one canned response.
    fn replay_store(status: u16, body: &str) -> SecretsManagerStore {
        let http_client = StaticReplayClient::new(vec![ReplayEvent::new(
            http::Request::builder()
                .method("POST")
                .uri("https://secretsmanager.us-east-1.amazonaws.com/")
                .body(SdkBody::from("{}"))
                .unwrap(),
            http::Response::builder()
                .status(status)
                .header("content-type", "application/x-amz-json-1.1")
                .body(SdkBody::from(body))
                .unwrap(),
        )]);
        let config = aws_sdk_secretsmanager::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "test"))
            .http_client(http_client)
            .build();
        SecretsManagerStore::from_client(aws_sdk_secretsmanager::Client::from_conf(config))
    }

    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_fetch_decodes_secret_string() {
        let store = replay_store(
            200,
            r#"{"ARN":"arn:aws:secretsmanager:us-east-1:123456789012:secret:app/db","Name":"app/db","SecretString":"{\"key\": \"abc123\"}","VersionId":"v1"}"#,
        );

        let outcome = store.fetch("app/db").await.unwrap();
        match outcome {
            StoreOutcome::Found(raw) => {
                assert_eq!(raw.string.as_deref(), Some(r#"{"key": "abc123"}"#));
                assert!(raw.binary.is_none());
            }
            other => panic!("expected a found secret, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_benign_service_error_is_not_found_with_one_warning() {
        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        // Access denied is not in the fatal set; the store collapses it to
        // absence after logging it once.
        let store = replay_store(
            400,
            r#"{"__type":"AccessDeniedException","Message":"not authorized to GetSecretValue"}"#,
        );

        let outcome = store.fetch("app/db").await.unwrap();
        assert_eq!(outcome, StoreOutcome::NotFound);

        let logs = capture.contents();
        assert_eq!(
            logs.matches("treating secret as absent").count(),
            1,
            "expected exactly one diagnostic entry, got:\n{logs}"
        );
    }

    #[test]
    fn test_classify_fatal_kinds() {
        let cases = [
            (
                GetSecretValueError::DecryptionFailure(DecryptionFailure::builder().build()),
                FatalErrorKind::DecryptionFailure,
            ),
            (
                GetSecretValueError::InternalServiceError(InternalServiceError::builder().build()),
                FatalErrorKind::InternalServiceError,
            ),
            (
                GetSecretValueError::InvalidParameterException(
                    InvalidParameterException::builder().build(),
                ),
                FatalErrorKind::InvalidParameter,
            ),
            (
                GetSecretValueError::InvalidRequestException(
                    InvalidRequestException::builder().build(),
                ),
                FatalErrorKind::InvalidRequest,
            ),
            (
                GetSecretValueError::ResourceNotFoundException(
                    ResourceNotFoundException::builder().build(),
                ),
                FatalErrorKind::ResourceNotFound,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(classify_fatal(&err), Some(expected));
        }
    }

    #[test]
    fn test_classify_unrecognized_is_benign() {
        let err = GetSecretValueError::unhandled("access denied");
        assert_eq!(classify_fatal(&err), None);
    }
}
