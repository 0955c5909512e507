//! The export pipeline: window → fetch → format → write.
//!
//! Each stage runs only after the previous one succeeded, so a failed fetch
//! never reaches the sink and the output file keeps its previous contents.

use tracing::{debug, info, warn};

use crate::{
    config::ExportConfig,
    errors::Error,
    io::{
        csv_file::{CsvFileSink, WriteSummary},
        sink::DataSink,
    },
    models::{
        bar::Bar, interval::Interval, request_params::TimesalesParams,
        session_filter::SessionFilter, symbol::Symbol,
    },
    providers::{DataProvider, tradier_rest::TradierProvider},
    window::TradingWindow,
};

/// What to export, with the window already resolved.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub symbol: Symbol,
    pub interval: Interval,
    pub session_filter: SessionFilter,
    /// `None` before the market opens; the export then has zero rows and no
    /// request is sent.
    pub window: Option<TradingWindow>,
}

/// Runs one export against any provider and sink.
pub async fn export_intraday<P, S>(
    provider: &P,
    sink: &S,
    request: ExportRequest,
) -> Result<S::Output, Error>
where
    P: DataProvider + ?Sized,
    S: DataSink + Sync + ?Sized,
{
    let bars: Vec<Bar> = match request.window {
        Some(window) => {
            debug!(start = %window.start_param(), end = %window.end_param(), "trading window");
            let params = TimesalesParams {
                symbol: request.symbol,
                interval: request.interval,
                window,
                session_filter: request.session_filter,
            };
            provider.fetch_bars(&params).await?
        }
        None => {
            warn!(symbol = %request.symbol, "market has not opened yet today; writing header only");
            Vec::new()
        }
    };

    Ok(sink.write(&bars).await?)
}

/// Runs the configured export against Tradier, writing to the configured file.
pub async fn run(config: &ExportConfig) -> Result<WriteSummary, Error> {
    let provider = TradierProvider::new(&config.tradier)?;
    let sink = CsvFileSink::new(&config.output, config.quoting);
    info!(
        endpoint = %provider.endpoint(),
        output = %sink.path().display(),
        timezone = %config.timezone,
        "starting export"
    );

    let request = ExportRequest {
        symbol: config.symbol.clone(),
        interval: config.interval,
        session_filter: config.session_filter,
        window: TradingWindow::current(config.timezone),
    };
    export_intraday(&provider, &sink, request).await
}
