//! Blocking HTTP client for the World Bank v2 API.

use super::{IndicatorSource, RawPayload, UpstreamError};
use log::{info, warn};
use std::time::{Duration, Instant};

/// Fixed historical window requested for every indicator.
pub const DATE_RANGE: &str = "2013:2018";
/// Provider page size; only the first page is imported.
pub const PAGE_SIZE: u32 = 100;

const DEFAULT_BASE_URL: &str = "http://api.worldbank.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`WorldBankClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Scheme and host, without trailing slash.
    pub base_url: String,
    /// Applies to connect and read of the single request.
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// World Bank indicator provider.
///
/// Uses a blocking client; callers on an async runtime must hop to a
/// blocking thread first.
pub struct WorldBankClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WorldBankClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|err| UpstreamError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the series URL for one indicator.
    pub fn indicator_url(&self, indicator: &str) -> String {
        format!(
            "{}/v2/countries/all/indicators/{indicator}?date={DATE_RANGE}&format=json&per_page={PAGE_SIZE}",
            self.base_url
        )
    }
}

impl IndicatorSource for WorldBankClient {
    fn name(&self) -> &str {
        "world_bank"
    }

    fn fetch(&self, indicator: &str) -> Result<RawPayload, UpstreamError> {
        let url = self.indicator_url(indicator);
        let started_at = Instant::now();
        info!("event=upstream_fetch module=upstream status=start indicator={indicator}");

        let response = self.client.get(&url).send().map_err(|err| {
            warn!(
                "event=upstream_fetch module=upstream status=error indicator={indicator} duration_ms={} error_code=network error={err}",
                started_at.elapsed().as_millis()
            );
            UpstreamError::Network {
                url: url.clone(),
                message: err.to_string(),
            }
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(
                "event=upstream_fetch module=upstream status=error indicator={indicator} duration_ms={} error_code=http_status http_status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(UpstreamError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let payload = response.json::<RawPayload>().map_err(|err| {
            warn!(
                "event=upstream_fetch module=upstream status=error indicator={indicator} duration_ms={} error_code=decode",
                started_at.elapsed().as_millis()
            );
            UpstreamError::Decode {
                url: url.clone(),
                message: err.to_string(),
            }
        })?;

        info!(
            "event=upstream_fetch module=upstream status=ok indicator={indicator} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::{UpstreamConfig, WorldBankClient};
    use crate::upstream::{IndicatorSource, UpstreamError};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;
    use std::time::Duration;

    /// Serves exactly one canned HTTP response on an ephemeral port.
    fn serve_once(response: String) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("loopback bind should succeed");
        let addr = listener.local_addr().expect("bound listener has an address");
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("client should connect");
            let mut reader = BufReader::new(stream.try_clone().expect("stream should clone"));
            let mut line = String::new();
            while reader.read_line(&mut line).expect("request should be readable") > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            stream
                .write_all(response.as_bytes())
                .expect("response should be writable");
        });
        (format!("http://{addr}"), handle)
    }

    fn http_response(status_line: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn client_for(base_url: String) -> WorldBankClient {
        WorldBankClient::new(&UpstreamConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .expect("client should build")
    }

    #[test]
    fn default_config_targets_world_bank_with_bounded_timeout() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_url, "http://api.worldbank.org");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn indicator_url_uses_fixed_window_and_page_size() {
        let client = client_for("http://localhost:9000/".to_string());

        assert_eq!(
            client.indicator_url("NY.GDP.MKTP.CD"),
            "http://localhost:9000/v2/countries/all/indicators/NY.GDP.MKTP.CD?date=2013:2018&format=json&per_page=100"
        );
    }

    #[test]
    fn ok_response_is_decoded_as_json() {
        let (base_url, server) = serve_once(http_response(
            "200 OK",
            "application/json",
            r#"[{"page":1},[{"date":"2016","value":1.5}]]"#,
        ));

        let payload = client_for(base_url)
            .fetch("SP.RUR.TOTL")
            .expect("200 with json body should succeed");
        server.join().expect("server thread should finish");

        assert_eq!(payload[1][0]["date"], "2016");
    }

    #[test]
    fn non_ok_status_is_reported_as_status_error() {
        let (base_url, server) = serve_once(http_response(
            "503 Service Unavailable",
            "text/plain",
            "busy",
        ));

        let err = client_for(base_url)
            .fetch("SP.RUR.TOTL")
            .expect_err("503 must fail");
        server.join().expect("server thread should finish");

        assert!(
            matches!(
                err,
                UpstreamError::Status { status: 503, ref url } if url.contains("SP.RUR.TOTL")
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn non_json_body_is_reported_as_decode_error() {
        let (base_url, server) = serve_once(http_response(
            "200 OK",
            "text/html",
            "<html>maintenance</html>",
        ));

        let err = client_for(base_url)
            .fetch("SP.RUR.TOTL")
            .expect_err("html body must fail to decode");
        server.join().expect("server thread should finish");

        assert!(
            matches!(err, UpstreamError::Decode { .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn refused_connection_is_reported_as_network_error() {
        let closed_addr = {
            let listener =
                TcpListener::bind("127.0.0.1:0").expect("loopback bind should succeed");
            listener.local_addr().expect("bound listener has an address")
        };

        let err = client_for(format!("http://{closed_addr}"))
            .fetch("SP.RUR.TOTL")
            .expect_err("closed port must fail");

        assert!(
            matches!(err, UpstreamError::Network { .. }),
            "unexpected error: {err}"
        );
    }
}
