// In-memory gateways for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use sitewatch_api::{CreateSite, Error, RecordId, SiteGateway, SiteRecord};

pub(crate) fn site_record(id: i64, name: &str, address: &str, status: &str) -> SiteRecord {
    SiteRecord {
        id: RecordId::Number(id),
        name: name.into(),
        address: address.into(),
        status: status.into(),
    }
}

pub(crate) fn record(id: i64, name: &str, status: &str) -> SiteRecord {
    site_record(id, name, "Rue A", status)
}

/// The two-site collection used throughout the scenarios.
pub(crate) fn paris_and_lyon() -> Vec<SiteRecord> {
    vec![
        site_record(1, "Paris Centre", "Rue A", "online"),
        site_record(2, "Lyon Sud", "Rue B", "pending"),
    ]
}

// ── FakeGateway ──────────────────────────────────────────────────

/// Behaves like a well-mannered server over an in-memory table.
#[derive(Default)]
pub(crate) struct FakeGateway {
    records: Mutex<Vec<SiteRecord>>,
    next_id: AtomicI64,
    fail_list: Mutex<Option<String>>,
    fail_mutation: Mutex<Option<u16>>,
    hold: Mutex<Option<oneshot::Receiver<()>>>,
    reply_status: Mutex<Option<String>>,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn with_records(records: Vec<SiteRecord>) -> Self {
        Self {
            next_id: AtomicI64::new(100),
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn fail_next_list(&self, message: &str) {
        *self.fail_list.lock().unwrap() = Some(message.to_owned());
    }

    /// Fail the next create/delete/update with this HTTP status.
    pub fn fail_next_mutation(&self, status: u16) {
        *self.fail_mutation.lock().unwrap() = Some(status);
    }

    /// Block the next mutation until the returned sender fires.
    pub fn hold_next_mutation(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.lock().unwrap() = Some(rx);
        tx
    }

    /// Answer the next create/update with this status in the returned
    /// record only; the stored table keeps the real one.
    pub fn reply_with_status(&self, status: &str) {
        *self.reply_status.lock().unwrap() = Some(status.to_owned());
    }

    fn reply(&self, mut rec: SiteRecord) -> SiteRecord {
        if let Some(status) = self.reply_status.lock().unwrap().take() {
            rec.status = status;
        }
        rec
    }

    /// Swap the whole remote table.
    pub fn set_records(&self, records: Vec<SiteRecord>) {
        *self.records.lock().unwrap() = records;
    }

    /// Remove a record behind the client's back.
    pub fn remove_remotely(&self, id: i64) {
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.id != RecordId::Number(id));
    }

    async fn before_mutation(&self, id: &str) -> Result<(), Error> {
        let hold = self.hold.lock().unwrap().take();
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        match self.fail_mutation.lock().unwrap().take() {
            Some(404) => Err(Error::NotFound { id: id.to_owned() }),
            Some(status) => Err(Error::Api {
                status,
                message: "server unavailable".into(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SiteGateway for FakeGateway {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn list_sites(&self) -> Result<Vec<SiteRecord>, Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_list.lock().unwrap().take() {
            return Err(Error::Api {
                status: 503,
                message,
            });
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create_site(&self, input: &CreateSite) -> Result<SiteRecord, Error> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.before_mutation("new").await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let rec = site_record(id, &input.name, &input.address, "offline");
        self.records.lock().unwrap().push(rec.clone());
        Ok(self.reply(rec))
    }

    async fn delete_site(&self, id: &str) -> Result<(), Error> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.before_mutation(id).await?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id.to_string() != id);
        if records.len() == before {
            return Err(Error::NotFound { id: id.to_owned() });
        }
        Ok(())
    }

    async fn update_site_status(&self, id: &str, status: &str) -> Result<SiteRecord, Error> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.before_mutation(id).await?;
        let mut records = self.records.lock().unwrap();
        let rec = records
            .iter_mut()
            .find(|r| r.id.to_string() == id)
            .ok_or_else(|| Error::NotFound { id: id.to_owned() })?;
        status.clone_into(&mut rec.status);
        let rec = rec.clone();
        drop(records);
        Ok(self.reply(rec))
    }
}

// ── ScriptedGateway ──────────────────────────────────────────────

type ListReply = Result<Vec<SiteRecord>, String>;

/// Each `list_sites` call waits for the next scripted reply, so tests
/// decide the order in which overlapping fetches resolve.
pub(crate) struct ScriptedGateway {
    replies: Mutex<VecDeque<oneshot::Receiver<ListReply>>>,
    calls: watch::Sender<usize>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        let (calls, _) = watch::channel(0);
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls,
        }
    }

    /// Queue a reply slot for the next `list_sites` call.
    pub fn push(&self) -> oneshot::Sender<ListReply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(rx);
        tx
    }

    pub async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.calls.subscribe();
        rx.wait_for(|calls| *calls >= n).await.unwrap();
    }
}

#[async_trait]
impl SiteGateway for ScriptedGateway {
    fn backend_tag(&self) -> &'static str {
        "scripted"
    }

    async fn list_sites(&self) -> Result<Vec<SiteRecord>, Error> {
        let reply = self.replies.lock().unwrap().pop_front();
        self.calls.send_modify(|n| *n += 1);
        let Some(reply) = reply else {
            return Err(Error::Api {
                status: 500,
                message: "no scripted reply".into(),
            });
        };
        match reply.await {
            Ok(Ok(records)) => Ok(records),
            Ok(Err(message)) => Err(Error::Api {
                status: 503,
                message,
            }),
            Err(_) => Err(Error::Api {
                status: 500,
                message: "reply dropped".into(),
            }),
        }
    }

    async fn create_site(&self, _input: &CreateSite) -> Result<SiteRecord, Error> {
        Err(unscripted())
    }

    async fn delete_site(&self, _id: &str) -> Result<(), Error> {
        Err(unscripted())
    }

    async fn update_site_status(&self, _id: &str, _status: &str) -> Result<SiteRecord, Error> {
        Err(unscripted())
    }
}

fn unscripted() -> Error {
    Error::Api {
        status: 501,
        message: "not scripted".into(),
    }
}
