use crate::core::{DownloadEvent, FetchReport, PoiSource, QueryRequest, StopReason, PAGE_SIZE};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Walks result pages one at a time until upstream runs out or fails.
///
/// Failures never escape as errors: the loop stops and reports why in
/// [`FetchReport::stop`], keeping whatever was accumulated before.
pub struct Paginator<'a, Q: PoiSource> {
    source: &'a Q,
    page_delay: Duration,
    max_pages: Option<u32>,
    events: Option<UnboundedSender<DownloadEvent>>,
}

impl<'a, Q: PoiSource> Paginator<'a, Q> {
    pub fn new(source: &'a Q) -> Self {
        Self {
            source,
            page_delay: DEFAULT_PAGE_DELAY,
            max_pages: Some(DEFAULT_MAX_PAGES),
            events: None,
        }
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_events(mut self, events: Option<UnboundedSender<DownloadEvent>>) -> Self {
        self.events = events;
        self
    }

    pub async fn fetch_all(&self, keywords: &str, city: &str) -> FetchReport {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let request = QueryRequest::new(keywords, city, page);

            let stop = match self.source.search(&request).await {
                Err(e) => {
                    tracing::warn!("⚠️ Request for page {} failed: {}", page, e);
                    Some(StopReason::TransportFailed {
                        message: e.to_string(),
                    })
                }
                Ok(result) if !result.is_success() => {
                    tracing::warn!(
                        "⚠️ Page {} rejected: status={:?} info={:?} infocode={:?}",
                        page,
                        result.status(),
                        result.info(),
                        result.infocode()
                    );
                    Some(StopReason::Rejected {
                        status: result.status().map(str::to_string),
                        info: result.info().map(str::to_string),
                    })
                }
                Ok(result) => {
                    let pois = result.pois();
                    let returned = pois.len();

                    if returned == 0 {
                        Some(StopReason::EmptyPage)
                    } else {
                        records.extend(pois);
                        tracing::info!(
                            "📄 Page {}: {} POIs (total {}, upstream count {:?})",
                            page,
                            returned,
                            records.len(),
                            result.count()
                        );
                        self.emit(DownloadEvent::PageFetched {
                            page,
                            returned,
                            accumulated: records.len(),
                        });

                        if returned < PAGE_SIZE {
                            Some(StopReason::LastPage { returned })
                        } else {
                            match self.max_pages {
                                Some(max_pages) if page >= max_pages => {
                                    Some(StopReason::PageLimit { max_pages })
                                }
                                _ => None,
                            }
                        }
                    }
                }
            };

            if let Some(reason) = stop {
                tracing::info!(
                    "🏁 Pagination stopped after {} page(s): {}",
                    page,
                    reason
                );
                self.emit(DownloadEvent::FetchStopped {
                    pages: page,
                    reason: reason.clone(),
                });
                return FetchReport {
                    records,
                    pages_requested: page,
                    stop: reason,
                };
            }

            page += 1;
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }
    }

    fn emit(&self, event: DownloadEvent) {
        if let Some(events) = &self.events {
            // 接收端已關閉時忽略
            let _ = events.send(event);
        }
    }
}
