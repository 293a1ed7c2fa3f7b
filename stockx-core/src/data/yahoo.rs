//! Yahoo Finance quote client.
//!
//! History and latest quotes come from the v8 chart API; fundamentals come
//! from the v10 quoteSummary API. Every request is a single attempt.
//!
//! quoteSummary needs a session cookie plus a crumb token. The cookie lives in
//! the client's jar; the crumb is fetched on the first fundamentals request
//! and cached until the provider answers 401/403.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{latest_quote, DataError, DataSource, QuoteClient, RawBar, SymbolHistory};
use crate::domain::{Fundamentals, Quote, TimeRange};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

const CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const SUMMARY_BASE: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "assetProfile,price,summaryDetail,defaultKeyStatistics";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const REFERER: &str = "https://finance.yahoo.com/";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance v10 quoteSummary response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryModules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryModules {
    #[serde(default)]
    asset_profile: AssetProfile,
    #[serde(default)]
    price: PriceModule,
    #[serde(default)]
    summary_detail: SummaryDetail,
    #[serde(default)]
    default_key_statistics: KeyStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    sector: Option<serde_json::Value>,
    long_business_summary: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    short_name: Option<serde_json::Value>,
    market_cap: Option<NumberField>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<NumberField>,
    dividend_yield: Option<NumberField>,
    fifty_two_week_high: Option<NumberField>,
    fifty_two_week_low: Option<NumberField>,
    beta: Option<NumberField>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    trailing_eps: Option<NumberField>,
}

/// Numeric fields arrive as `{"raw": 1.23, "fmt": "1.23"}`, or `{}` when absent.
#[derive(Debug, Default, Deserialize)]
struct NumberField {
    raw: Option<serde_json::Value>,
}

impl NumberField {
    fn as_f64(&self) -> Option<f64> {
        self.raw
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .filter(|v| v.is_finite())
    }

    fn as_u64(&self) -> Option<u64> {
        let raw = self.raw.as_ref()?;
        raw.as_u64()
            .or_else(|| raw.as_f64().filter(|v| *v >= 0.0 && v.is_finite()).map(|v| v as u64))
    }
}

fn text(value: &Option<serde_json::Value>) -> Option<String> {
    value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(field: &Option<NumberField>) -> Option<f64> {
    field.as_ref().and_then(NumberField::as_f64)
}

/// HTTP settings for the Yahoo client.
#[derive(Debug, Clone)]
pub struct YahooOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for YahooOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
        }
    }
}

/// Yahoo Finance quote client.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(options: &YahooOptions) -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            crumb: Mutex::new(None),
        })
    }

    /// Cached crumb, or a fresh one from the cookie + getcrumb handshake.
    fn crumb(&self) -> Option<String> {
        if let Some(crumb) = self.crumb.lock().ok().and_then(|c| c.clone()) {
            return Some(crumb);
        }

        // The cookie response itself is usually a 404; only the jar matters.
        if let Err(e) = self.client.get(COOKIE_URL).header("referer", REFERER).send() {
            warn!(error = %e, "yahoo session cookie unavailable");
            return None;
        }
        let body = match self
            .client
            .get(CRUMB_URL)
            .header("referer", REFERER)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
        {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "yahoo crumb unavailable");
                return None;
            }
        };

        let Some(crumb) = parse_crumb(&body) else {
            warn!("yahoo crumb response was not a token");
            return None;
        };
        if let Ok(mut slot) = self.crumb.lock() {
            *slot = Some(crumb.clone());
        }
        Some(crumb)
    }

    fn forget_crumb(&self) {
        if let Ok(mut slot) = self.crumb.lock() {
            *slot = None;
        }
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = (end + chrono::Duration::days(1))
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp()
            - 1;
        format!(
            "{CHART_BASE}/{}?period1={start_ts}&period2={end_ts}&interval=1d",
            urlencoding::encode(symbol)
        )
    }

    /// Chart URL for the last few sessions, used for latest quotes.
    fn recent_url(symbol: &str) -> String {
        format!("{CHART_BASE}/{}?range=5d&interval=1d", urlencoding::encode(symbol))
    }

    fn summary_url(symbol: &str, crumb: Option<&str>) -> String {
        let mut url = format!(
            "{SUMMARY_BASE}/{}?modules={SUMMARY_MODULES}",
            urlencoding::encode(symbol)
        );
        if let Some(crumb) = crumb {
            url.push_str("&crumb=");
            url.push_str(&urlencoding::encode(crumb));
        }
        url
    }

    /// Issue one GET and decode the JSON body, mapping transport and status failures.
    fn get_json<T: DeserializeOwned>(&self, symbol: &str, url: &str) -> Result<T, DataError> {
        debug!(symbol, url, "yahoo request");
        let resp = self.client.get(url).send().map_err(|e| DataError::NetworkUnreachable {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok());
        if let Some(err) = status_error(symbol, resp.status(), retry_after) {
            return Err(err);
        }

        resp.json().map_err(|e| DataError::ResponseFormatChanged {
            symbol: symbol.to_string(),
            reason: format!("failed to parse response: {e}"),
        })
    }

    fn api_error(symbol: &str, err: Option<ApiError>) -> DataError {
        match err {
            Some(err) if err.code == "Not Found" => DataError::not_found(symbol),
            Some(err) => DataError::ResponseFormatChanged {
                symbol: symbol.to_string(),
                reason: format!("{}: {}", err.code, err.description),
            },
            None => DataError::ResponseFormatChanged {
                symbol: symbol.to_string(),
                reason: "empty result with no error".into(),
            },
        }
    }

    fn format_error(symbol: &str, reason: impl Into<String>) -> DataError {
        DataError::ResponseFormatChanged {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    /// Parse the chart API response into bars plus the reported previous close.
    fn parse_chart(
        symbol: &str,
        resp: ChartResponse,
    ) -> Result<(Vec<RawBar>, Option<f64>), DataError> {
        let result = match resp.chart.result {
            Some(result) => result,
            None => return Err(Self::api_error(symbol, resp.chart.error)),
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| Self::format_error(symbol, "result array is empty"))?;

        let reported_previous = data
            .meta
            .chart_previous_close
            .or(data.meta.previous_close);

        // A symbol with no sessions in the window has no timestamps at all.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| Self::format_error(symbol, "no quote data"))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| Self::format_error(symbol, format!("invalid timestamp: {ts}")))?;

            let bar = RawBar {
                date,
                open: quote.open.get(i).copied().flatten(),
                high: quote.high.get(i).copied().flatten(),
                low: quote.low.get(i).copied().flatten(),
                close: quote.close.get(i).copied().flatten(),
                volume: quote.volume.get(i).copied().flatten(),
            };

            // Skip holidays and other non-trading placeholders.
            if !bar.is_void() {
                bars.push(bar);
            }
        }

        if bars.is_empty() {
            return Err(DataError::not_found(symbol));
        }

        Ok((bars, reported_previous))
    }

    fn parse_summary(symbol: &str, resp: SummaryResponse) -> Result<Fundamentals, DataError> {
        let result = match resp.quote_summary.result {
            Some(result) => result,
            None => return Err(Self::api_error(symbol, resp.quote_summary.error)),
        };
        let modules = result
            .into_iter()
            .next()
            .ok_or_else(|| Self::format_error(symbol, "result array is empty"))?;

        Ok(Fundamentals {
            short_name: text(&modules.price.short_name),
            long_business_summary: text(&modules.asset_profile.long_business_summary),
            sector: text(&modules.asset_profile.sector),
            market_cap: modules.price.market_cap.as_ref().and_then(NumberField::as_u64),
            trailing_pe: number(&modules.summary_detail.trailing_pe),
            trailing_eps: number(&modules.default_key_statistics.trailing_eps),
            dividend_yield: number(&modules.summary_detail.dividend_yield),
            fifty_two_week_high: number(&modules.summary_detail.fifty_two_week_high),
            fifty_two_week_low: number(&modules.summary_detail.fifty_two_week_low),
            beta: number(&modules.summary_detail.beta),
        })
    }
}

impl QuoteClient for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_symbol_history(
        &self,
        symbol: &str,
        range: &TimeRange,
    ) -> Result<SymbolHistory, DataError> {
        let url = Self::chart_url(symbol, range.start(), range.end());
        let chart: ChartResponse = self.get_json(symbol, &url)?;
        let (bars, _) = Self::parse_chart(symbol, chart)?;
        Ok(SymbolHistory {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }

    fn fetch_latest_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        let chart: ChartResponse = self.get_json(symbol, &Self::recent_url(symbol))?;
        let (bars, reported_previous) = Self::parse_chart(symbol, chart)?;
        latest_quote(symbol, &bars, reported_previous)
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataError> {
        let crumb = self.crumb();
        let url = Self::summary_url(symbol, crumb.as_deref());
        let summary: SummaryResponse = match self.get_json(symbol, &url) {
            Err(e @ DataError::AuthenticationRequired { .. }) => {
                self.forget_crumb();
                return Err(e);
            }
            other => other?,
        };
        Self::parse_summary(symbol, summary)
    }
}

/// A crumb is a short token; HTML or rate-limit pages are rejected.
fn parse_crumb(body: &str) -> Option<String> {
    let body = body.trim();
    let plausible = !body.is_empty()
        && body.len() < 100
        && !body.contains(char::is_whitespace)
        && !body.contains('<');
    plausible.then(|| body.to_string())
}

/// Map a non-success HTTP status to the error it stands for.
fn status_error(
    symbol: &str,
    status: reqwest::StatusCode,
    retry_after: Option<&str>,
) -> Option<DataError> {
    use reqwest::StatusCode;

    let symbol = symbol.to_string();
    match status {
        s if s.is_success() => None,
        StatusCode::NOT_FOUND => Some(DataError::SymbolNotFound { symbol }),
        StatusCode::TOO_MANY_REQUESTS => Some(DataError::RateLimited {
            symbol,
            retry_after_secs: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Some(DataError::AuthenticationRequired { symbol })
        }
        _ => Some(DataError::NetworkUnreachable {
            symbol,
            reason: format!("HTTP {status}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crumb_accepts_short_tokens_only() {
        assert_eq!(parse_crumb("  abc.DEF/12\n").as_deref(), Some("abc.DEF/12"));
        assert_eq!(parse_crumb(""), None);
        assert_eq!(parse_crumb("Too Many Requests"), None);
        assert_eq!(parse_crumb("<!DOCTYPE html><html>"), None);
        assert_eq!(parse_crumb(&"x".repeat(200)), None);
    }

    #[test]
    fn summary_url_carries_encoded_crumb() {
        let url = YahooProvider::summary_url("TCS.NS", Some("a/b"));
        assert!(url.contains("/TCS.NS?modules=assetProfile"));
        assert!(url.ends_with("&crumb=a%2Fb"));
        assert!(!YahooProvider::summary_url("AAPL", None).contains("crumb"));
    }

    #[test]
    fn success_status_is_not_an_error() {
        assert!(status_error("AAPL", reqwest::StatusCode::OK, None).is_none());
    }

    #[test]
    fn not_found_status() {
        let err = status_error("AAPL", reqwest::StatusCode::NOT_FOUND, None).unwrap();
        assert!(matches!(err, DataError::SymbolNotFound { ref symbol } if symbol == "AAPL"));
    }

    #[test]
    fn rate_limit_reads_retry_after() {
        let err =
            status_error("AAPL", reqwest::StatusCode::TOO_MANY_REQUESTS, Some("120")).unwrap();
        assert!(matches!(err, DataError::RateLimited { retry_after_secs: 120, .. }));
    }

    #[test]
    fn rate_limit_defaults_without_usable_retry_after() {
        for header in [None, Some("soon"), Some("Wed, 21 Oct 2015 07:28:00 GMT")] {
            let err =
                status_error("AAPL", reqwest::StatusCode::TOO_MANY_REQUESTS, header).unwrap();
            assert!(matches!(err, DataError::RateLimited { retry_after_secs: 60, .. }));
        }
    }

    #[test]
    fn unauthorized_and_forbidden_need_auth() {
        for status in [reqwest::StatusCode::UNAUTHORIZED, reqwest::StatusCode::FORBIDDEN] {
            let err = status_error("AAPL", status, None).unwrap();
            assert!(matches!(err, DataError::AuthenticationRequired { .. }));
        }
    }

    #[test]
    fn other_failures_are_network_errors() {
        let err = status_error("AAPL", reqwest::StatusCode::BAD_GATEWAY, None).unwrap();
        match err {
            DataError::NetworkUnreachable { symbol, reason } => {
                assert_eq!(symbol, "AAPL");
                assert!(reason.contains("502"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn chart(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_chart_and_skips_void_rows() {
        let resp = chart(
            r#"{"chart":{"result":[{
                "meta":{"regularMarketPrice":12.0,"chartPreviousClose":9.5},
                "timestamp":[1704205800,1704292200,1704378600],
                "indicators":{"quote":[{
                    "open":[10.0,null,11.0],
                    "high":[10.5,null,11.5],
                    "low":[9.5,null,10.5],
                    "close":[10.2,null,11.2],
                    "volume":[1000,null,1200]
                }]}
            }],"error":null}}"#,
        );
        let (bars, prev) = YahooProvider::parse_chart("AAPL", resp).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, Some(10.2));
        assert_eq!(bars[1].volume, Some(1200));
        assert_eq!(prev, Some(9.5));
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let resp = chart(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
        let err = YahooProvider::parse_chart("BADTICKER", resp).unwrap_err();
        assert_eq!(err, DataError::not_found("BADTICKER"));
    }

    #[test]
    fn other_api_error_is_format_change() {
        let resp = chart(r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"x"}}}"#);
        let err = YahooProvider::parse_chart("AAPL", resp).unwrap_err();
        assert_eq!(err.category(), "format");
    }

    #[test]
    fn no_timestamps_is_not_found() {
        let resp = chart(r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#);
        let err = YahooProvider::parse_chart("AAPL", resp).unwrap_err();
        assert_eq!(err.category(), "not_found");
    }

    #[test]
    fn summary_fields_resolve_to_options() {
        let resp: SummaryResponse = serde_json::from_str(
            r#"{"quoteSummary":{"result":[{
                "assetProfile":{"sector":"Technology","longBusinessSummary":"Makes phones."},
                "price":{"shortName":"Apple Inc.","marketCap":{"raw":3000000000000,"fmt":"3T"}},
                "summaryDetail":{"trailingPE":{"raw":28.5},"dividendYield":{},"beta":{"raw":"oops"}},
                "defaultKeyStatistics":{"trailingEps":{"raw":6.1}}
            }],"error":null}}"#,
        )
        .unwrap();
        let f = YahooProvider::parse_summary("AAPL", resp).unwrap();
        assert_eq!(f.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(f.sector.as_deref(), Some("Technology"));
        assert_eq!(f.market_cap, Some(3_000_000_000_000));
        assert_eq!(f.trailing_pe, Some(28.5));
        assert_eq!(f.trailing_eps, Some(6.1));
        assert_eq!(f.dividend_yield, None);
        assert_eq!(f.beta, None);
        assert_eq!(f.fifty_two_week_high, None);
    }

    #[test]
    fn missing_modules_are_all_none() {
        let resp: SummaryResponse =
            serde_json::from_str(r#"{"quoteSummary":{"result":[{}],"error":null}}"#).unwrap();
        let f = YahooProvider::parse_summary("AAPL", resp).unwrap();
        assert!(f.is_blank());
    }

    #[test]
    fn urls_encode_index_symbols() {
        assert!(YahooProvider::recent_url("^NSEI").contains("%5ENSEI?range=5d"));
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let url = YahooProvider::chart_url("AAPL", start, start);
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704153599"));
    }
}
