use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{DEFAULT_V4_ENDPOINT, DirectError, LegacyApi, ReqwestTransport, settle};
use crate::domain::{
    Credentials, PollOptions, ReportId, ReportInfo, ReportRequest, ReportStatus, WordstatItem,
};
use crate::transport::{
    decode_create_report_json_response, decode_delete_report_json_response,
    decode_report_list_json_response, decode_wordstat_report_json_response,
    encode_create_report_body, encode_delete_report_body, encode_report_list_body,
    encode_wordstat_report_body,
};

#[derive(Clone)]
/// Wordstat report lifecycle over Live v4.
///
/// A report moves `Pending → Done | Failed` on the server; this client only
/// creates, observes, fetches and deletes it. Nothing is cached locally and no
/// call is retried.
///
/// ```rust,no_run
/// use std::time::Duration;
///
/// use yadirect::{Credentials, GeoId, Phrase, PollOptions, ReportClient, ReportRequest};
///
/// # async fn run() -> Result<(), yadirect::DirectError> {
/// let client = ReportClient::new(Credentials::new("login", "token")?);
/// let request = ReportRequest::new(vec![Phrase::new("купить слона")], vec![GeoId::new(213)]);
///
/// let id = client.create(&request).await?;
/// client
///     .wait_until_done(id, &PollOptions { interval: Duration::from_secs(5), timeout: Duration::from_secs(300) })
///     .await?;
/// let items = client.fetch(id).await?;
/// client.delete(id).await?;
/// # let _ = items;
/// # Ok(())
/// # }
/// ```
pub struct ReportClient {
    credentials: Credentials,
    legacy: LegacyApi,
}

impl ReportClient {
    /// Create a client using the default Live v4 endpoint.
    ///
    /// For more customization, use [`crate::ClientBuilder`].
    pub fn new(credentials: Credentials) -> Self {
        Self::from_parts(
            credentials,
            LegacyApi {
                endpoint: DEFAULT_V4_ENDPOINT.to_owned(),
                http: Arc::new(ReqwestTransport {
                    client: reqwest::Client::new(),
                }),
            },
        )
    }

    pub(super) fn from_parts(credentials: Credentials, legacy: LegacyApi) -> Self {
        Self {
            credentials,
            legacy,
        }
    }

    /// Credentials sent with every request of this client.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Submit a new report (`CreateNewWordstatReport`).
    ///
    /// Not idempotent: calling twice creates two reports.
    pub async fn create(&self, request: &ReportRequest) -> Result<ReportId, DirectError> {
        info!(
            phrases = request.phrases().len(),
            geo_ids = ?request.geo_ids(),
            "creating Wordstat report"
        );
        let body = self
            .legacy
            .call(encode_create_report_body(self.credentials.token(), request))
            .await?;
        let id = settle(decode_create_report_json_response(&body))?;
        info!(report_id = %id, "Wordstat report created");
        Ok(id)
    }

    /// All reports currently stored for the account (`GetWordstatReportList`).
    pub async fn list(&self) -> Result<Vec<ReportInfo>, DirectError> {
        let body = self
            .legacy
            .call(encode_report_list_body(self.credentials.token()))
            .await?;
        let reports = settle(decode_report_list_json_response(&body))?;
        info!(reports = reports.len(), "Wordstat report list received");
        Ok(reports)
    }

    /// Status of one report.
    ///
    /// The API has no lookup by id, so this scans the full account list on every call.
    pub async fn status(&self, id: ReportId) -> Result<ReportStatus, DirectError> {
        let status = self
            .list()
            .await?
            .into_iter()
            .find(|report| report.id == id)
            .map(|report| report.status)
            .ok_or(DirectError::ReportNotFound { id })?;
        debug!(report_id = %id, status = ?status, "Wordstat report status");
        Ok(status)
    }

    /// Results of a finished report (`GetWordstatReport`), in server order.
    ///
    /// Only meaningful once [`ReportClient::status`] is [`ReportStatus::Done`];
    /// otherwise the server answers with an error.
    pub async fn fetch(&self, id: ReportId) -> Result<Vec<WordstatItem>, DirectError> {
        let body = self
            .legacy
            .call(encode_wordstat_report_body(self.credentials.token(), id))
            .await?;
        let items = settle(decode_wordstat_report_json_response(&body))?;
        info!(report_id = %id, items = items.len(), "Wordstat report fetched");
        Ok(items)
    }

    /// Remove the report on the server (`DeleteWordstatReport`).
    pub async fn delete(&self, id: ReportId) -> Result<(), DirectError> {
        let body = self
            .legacy
            .call(encode_delete_report_body(self.credentials.token(), id))
            .await?;
        settle(decode_delete_report_json_response(&body))?;
        info!(report_id = %id, "Wordstat report deleted");
        Ok(())
    }

    /// Poll [`ReportClient::status`] until the report is done.
    ///
    /// Errors:
    /// - [`DirectError::ReportFailed`] when the server marks the report failed,
    /// - [`DirectError::PollTimeout`] once `options.timeout` elapses,
    /// - any error from the status call itself.
    pub async fn wait_until_done(
        &self,
        id: ReportId,
        options: &PollOptions,
    ) -> Result<(), DirectError> {
        self.wait_until_done_or_cancelled(id, options, std::future::pending::<()>())
            .await
    }

    /// Same as [`ReportClient::wait_until_done`], but stops with
    /// [`DirectError::PollCancelled`] as soon as `cancel` resolves.
    pub async fn wait_until_done_or_cancelled<C>(
        &self,
        id: ReportId,
        options: &PollOptions,
        cancel: C,
    ) -> Result<(), DirectError>
    where
        C: Future<Output = ()>,
    {
        info!(
            report_id = %id,
            interval = ?options.interval,
            timeout = ?options.timeout,
            "waiting for Wordstat report"
        );
        tokio::select! {
            outcome = tokio::time::timeout(options.timeout, self.poll_until_done(id, options.interval)) => {
                match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(report_id = %id, waited = ?options.timeout, "Wordstat report not ready in time");
                        Err(DirectError::PollTimeout { id, waited: options.timeout })
                    }
                }
            }
            () = cancel => {
                warn!(report_id = %id, "waiting for Wordstat report cancelled");
                Err(DirectError::PollCancelled { id })
            }
        }
    }

    async fn poll_until_done(&self, id: ReportId, interval: Duration) -> Result<(), DirectError> {
        loop {
            match self.status(id).await? {
                ReportStatus::Done => {
                    info!(report_id = %id, "Wordstat report is ready");
                    return Ok(());
                }
                ReportStatus::Failed => {
                    warn!(report_id = %id, "Wordstat report failed on the server");
                    return Err(DirectError::ReportFailed { id });
                }
                _ => tokio::time::sleep(interval).await,
            }
        }
    }
}
