use std::io;
use std::time::{Duration, Instant};

use pages_core::{Effect, Msg, RequestOutcome, ResultKind, StagedInput};
use pages_engine::{Endpoint, EngineEvent, EngineHandle, EngineServices};
use pages_logging::{pages_info, pages_warn};

/// Bridges core effects to the engine and engine events back to core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(services: EngineServices) -> io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(services)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    request_id,
                    kind,
                    context,
                } => {
                    pages_info!(
                        "Submit request_id={} kind={:?} url={}",
                        request_id,
                        kind,
                        context.url
                    );
                    self.engine
                        .submit(request_id, map_kind(kind), context.url, context.question);
                }
                Effect::PersistStaged(staged) => {
                    self.engine.persist(to_engine_staged(staged));
                }
            }
        }
    }

    /// Runs the surface's startup reads and returns their messages, waiting
    /// until the staged input arrives or `timeout` passes.
    pub fn load_initial(&self, timeout: Duration) -> Vec<Msg> {
        self.engine.load_initial();
        let deadline = Instant::now() + timeout;
        let mut msgs = Vec::new();
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            let Some(event) = self.engine.recv_timeout(remaining) else {
                break;
            };
            let staged_arrived = matches!(event, EngineEvent::StagedLoaded(_));
            msgs.extend(map_event(event));
            if staged_arrived {
                return msgs;
            }
        }
        pages_warn!("startup reads did not finish within {:?}", timeout);
        msgs
    }

    /// Closes the engine after the relay writes already enqueued have landed,
    /// so results outlive the surface.
    pub fn shutdown(self) {
        self.engine.shutdown();
    }

    /// Waits up to `wait` for the first event, then drains whatever else is ready.
    pub fn poll(&self, wait: Duration) -> Vec<Msg> {
        let mut msgs = Vec::new();
        let first = if wait.is_zero() {
            self.engine.try_recv()
        } else {
            self.engine.recv_timeout(wait)
        };
        let Some(first) = first else {
            return msgs;
        };
        msgs.extend(map_event(first));
        while let Some(event) = self.engine.try_recv() {
            msgs.extend(map_event(event));
        }
        msgs
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::ActiveTabResolved(url) => Some(Msg::ActiveTabResolved(url)),
        EngineEvent::StagedLoaded(staged) => Some(Msg::StagedInputLoaded(StagedInput {
            last_url: staged.last_url,
            last_q: staged.last_q,
        })),
        EngineEvent::RequestCompleted {
            request_id,
            endpoint,
            result,
        } => Some(Msg::RequestResolved {
            request_id,
            kind: map_endpoint(endpoint),
            outcome: match result {
                Ok(html) => RequestOutcome::Rendered(html),
                Err(err) => RequestOutcome::Failed(err.to_string()),
            },
        }),
        // Failures are already logged by the engine; nothing to show.
        EngineEvent::Persisted { .. } => None,
    }
}

fn map_kind(kind: ResultKind) -> Endpoint {
    match kind {
        ResultKind::Summary => Endpoint::Summary,
        ResultKind::Answer => Endpoint::Qa,
    }
}

fn map_endpoint(endpoint: Endpoint) -> ResultKind {
    match endpoint {
        Endpoint::Summary => ResultKind::Summary,
        Endpoint::Qa => ResultKind::Answer,
    }
}

fn to_engine_staged(staged: StagedInput) -> pages_engine::StagedInput {
    pages_engine::StagedInput {
        last_url: staged.last_url,
        last_q: staged.last_q,
    }
}

#[cfg(test)]
mod tests {
    use pages_core::{Msg, RequestOutcome, ResultKind};
    use pages_engine::{EngineEvent, Endpoint, RelayError};

    use super::{map_endpoint, map_event, map_kind};

    #[test]
    fn kinds_round_trip_through_endpoints() {
        for kind in [ResultKind::Summary, ResultKind::Answer] {
            assert_eq!(map_endpoint(map_kind(kind)), kind);
        }
    }

    #[test]
    fn successful_request_becomes_rendered_outcome() {
        let msg = map_event(EngineEvent::RequestCompleted {
            request_id: 9,
            endpoint: Endpoint::Qa,
            result: Ok("<p>ok</p>".into()),
        });
        assert_eq!(
            msg,
            Some(Msg::RequestResolved {
                request_id: 9,
                kind: ResultKind::Answer,
                outcome: RequestOutcome::Rendered("<p>ok</p>".into()),
            })
        );
    }

    #[test]
    fn persisted_events_are_not_forwarded() {
        assert_eq!(map_event(EngineEvent::Persisted { result: Ok(()) }), None);
        assert_eq!(
            map_event(EngineEvent::Persisted {
                result: Err(RelayError::Unavailable("disk full".into())),
            }),
            None
        );
    }
}
