use super::{AssetDesk, StoreChange};
use crate::core::{EntityData, Record};
use crate::remote::{ApiResponse, RemoteResult};
use chrono::Utc;
use log::warn;
use tracing::{Instrument, Level, event, info_span};

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<D> {
    /// A new record was appended. `synced` is false for a local fallback
    /// record.
    Created { record: Record<D>, synced: bool },
    Updated { record: Record<D>, synced: bool },
    /// The record being edited no longer exists; nothing changed.
    Skipped { id: String },
}

impl<D> SaveOutcome<D> {
    pub fn record(&self) -> Option<&Record<D>> {
        match self {
            SaveOutcome::Created { record, .. } | SaveOutcome::Updated { record, .. } => {
                Some(record)
            }
            SaveOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(
            self,
            SaveOutcome::Created { synced: true, .. } | SaveOutcome::Updated { synced: true, .. }
        )
    }
}

impl AssetDesk {
    /// Saves a form draft of kind `D`.
    ///
    /// With an editing reference the draft replaces that record's attributes.
    /// Without one the remote is asked to create the record; if it fails or
    /// answers with something unusable, a local record is synthesized instead
    /// and marked pending sync. Remote failures are logged, never returned.
    /// The kind's form is closed on every path.
    pub async fn save<D: EntityData>(
        &self,
        draft: D,
        editing: Option<&Record<D>>,
    ) -> SaveOutcome<D> {
        match editing {
            Some(editing) => {
                let span =
                    info_span!("desk.save", kind = %D::KIND, op = "update", id = %editing.id);
                self.apply_update(editing.id.clone(), draft)
                    .instrument(span)
                    .await
            }
            None => {
                let span = info_span!("desk.save", kind = %D::KIND, op = "create");
                self.apply_create(draft).instrument(span).await
            }
        }
    }

    /// Saves `draft` against whatever the kind's form is currently editing.
    pub async fn submit<D: EntityData>(&self, draft: D) -> SaveOutcome<D> {
        let editing = self.read().await.session::<D>().editing().cloned();
        self.save(draft, editing.as_ref()).await
    }

    async fn apply_create<D: EntityData>(&self, draft: D) -> SaveOutcome<D> {
        let created = match serde_json::to_value(&draft) {
            Ok(body) => remote_record::<D>(self.remote().create(D::KIND, body).await),
            Err(err) => {
                warn!("failed to encode {} draft: {}", D::KIND, err);
                None
            }
        };

        self.commit::<D, _, _>(move |state| {
            let collection = state.collection_mut::<D>();
            // A server id that is already taken would overwrite another record.
            let created = created.filter(|record| {
                let taken = collection.contains(&record.id);
                if taken {
                    warn!(
                        "remote returned an existing {} id '{}', creating locally",
                        D::KIND,
                        record.id
                    );
                }
                !taken
            });
            let synced = created.is_some();
            let record = match created {
                Some(record) => {
                    collection.upsert(record.clone());
                    collection.clear_pending(&record.id);
                    record
                }
                None => {
                    let mut data = draft;
                    data.fill_local_defaults();
                    let id = collection.next_local_id(Utc::now().timestamp_millis());
                    let record = Record::new(id, data);
                    collection.upsert(record.clone());
                    collection.mark_pending(&record.id);
                    record
                }
            };
            state.session_mut::<D>().close();

            event!(Level::INFO, id = %record.id, synced, "record created");
            let change = StoreChange::Upserted {
                id: record.id.clone(),
            };
            (SaveOutcome::Created { record, synced }, Some(change))
        })
        .await
    }

    async fn apply_update<D: EntityData>(&self, id: String, draft: D) -> SaveOutcome<D> {
        let Some(current) = self.get::<D>(&id).await else {
            self.cancel::<D>().await;
            event!(Level::DEBUG, "edited record no longer exists");
            return SaveOutcome::Skipped { id };
        };

        let body = merged_data(&current, &draft);
        let synced = match serde_json::to_value(Record::new(id.as_str(), &body)) {
            Ok(body) => match self.remote().update(D::KIND, &id, body).await {
                Ok(_) => true,
                Err(err) => {
                    warn!(
                        "remote update failed, applying locally: kind='{}' id='{}' error='{}'",
                        D::KIND,
                        id,
                        err
                    );
                    false
                }
            },
            Err(err) => {
                warn!("failed to encode {} draft: {}", D::KIND, err);
                false
            }
        };

        self.commit::<D, _, _>(move |state| {
            let collection = state.collection_mut::<D>();
            let updated = collection
                .update_with(&id, |record| record.data = merged_data(record, &draft))
                .cloned();
            if updated.is_some() {
                if synced {
                    collection.clear_pending(&id);
                } else {
                    collection.mark_pending(&id);
                }
            }
            state.session_mut::<D>().close();

            match updated {
                Some(record) => {
                    let change = StoreChange::Upserted { id };
                    (SaveOutcome::Updated { record, synced }, Some(change))
                }
                // Deleted while the remote call was in flight.
                None => (SaveOutcome::Skipped { id }, None),
            }
        })
        .await
    }
}

/// `draft` laid over `record`. Falls back to the bare draft when the merge
/// does not decode.
fn merged_data<D: EntityData>(record: &Record<D>, draft: &D) -> D {
    record.merged_with(draft).unwrap_or_else(|err| {
        warn!(
            "failed to merge {} draft onto '{}', replacing attributes: {}",
            D::KIND,
            record.id,
            err
        );
        draft.clone()
    })
}

/// A usable server record: decodes as `D` and carries a non-empty id.
fn remote_record<D: EntityData>(result: RemoteResult<ApiResponse>) -> Option<Record<D>> {
    match result {
        Ok(response) => {
            let record = response.record::<D>();
            if record.is_none() {
                warn!("remote returned no usable {} record, creating locally", D::KIND);
            }
            record
        }
        Err(err) => {
            warn!(
                "remote create failed, creating locally: kind='{}' error='{}'",
                D::KIND,
                err
            );
            None
        }
    }
}
