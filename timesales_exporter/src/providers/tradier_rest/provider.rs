use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::{self, HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret;
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    models::{bar::Bar, request_params::TimesalesParams},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidBaseUrlSnafu, InvalidTokenSnafu,
        NetworkSnafu, ProviderError, ProviderInitError,
        tradier_rest::{
            TIMESALES_PATH, TradierSettings,
            params::construct_params,
            response::{describe_failure, parse_timesales},
        },
    },
};

pub struct TradierProvider {
    client: Client,
    endpoint: Url,
}

impl TradierProvider {
    /// Creates a new Tradier provider.
    ///
    /// The bearer token and `Accept: application/json` are installed as
    /// default headers; the token header is marked sensitive so it stays out
    /// of debug output.
    pub fn new(settings: &TradierSettings) -> Result<Self, ProviderInitError> {
        let endpoint = timesales_endpoint(&settings.base_url)?;

        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", settings.token.expose_secret()))
                .context(InvalidTokenSnafu)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self { client, endpoint })
    }

    /// Full URL of the time-and-sales endpoint this provider calls.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn timesales_endpoint(base_url: &str) -> Result<Url, ProviderInitError> {
    let raw = format!("{}/{TIMESALES_PATH}", base_url.trim().trim_end_matches('/'));
    let url = Url::parse(&raw).map_err(|e| {
        InvalidBaseUrlSnafu {
            url: base_url,
            message: e.to_string(),
        }
        .build()
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return InvalidBaseUrlSnafu {
            url: base_url,
            message: format!("unsupported scheme `{}`", url.scheme()),
        }
        .fail();
    }
    Ok(url)
}

#[async_trait]
impl DataProvider for TradierProvider {
    async fn fetch_bars(&self, params: &TimesalesParams) -> Result<Vec<Bar>, ProviderError> {
        let query = construct_params(params);
        info!(
            symbol = %params.symbol,
            interval = %params.interval,
            start = %params.window.start_param(),
            end = %params.window.end_param(),
            session_filter = %params.session_filter,
            "requesting time and sales"
        );

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&query)
            .send()
            .await
            .context(NetworkSnafu {
                url: self.endpoint.as_str(),
            })?;

        let status = response.status();
        let body = response.text().await.context(NetworkSnafu {
            url: self.endpoint.as_str(),
        })?;
        debug!(status = status.as_u16(), bytes = body.len(), "timesales response received");

        if !status.is_success() {
            return ApiSnafu {
                status: status.as_u16(),
                body: describe_failure(&body),
            }
            .fail();
        }

        let bars = parse_timesales(status.as_u16(), &body)?;
        info!(count = bars.len(), "parsed timesales bars");
        Ok(bars)
    }
}
