//! Generation-tagged controller around the [`Pipeline`].
//!
//! Every change of source or quality issues a new [`Generation`]. Runs are
//! never cancelled; when one completes, its generation is compared with the
//! current one and the outcome is either published or dropped. The last
//! request *started* wins, regardless of completion order.
//!
//! All state lives in `RefCell`s because the controller is driven from a
//! single logical thread. Borrows never span an `.await`.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use super::{ImageDecoder, ImageEncoder, Pipeline, PipelineError, RecompressionResult};
use crate::config::{CompressorConfig, ConfigError};
use crate::export::suggested_file_name;
use crate::quality::QualityFactor;
use crate::source::SourceImage;
use crate::stats::SizeStats;

/// Monotonic token identifying one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything one run needs, captured when the request is issued.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub generation: Generation,
    pub source: Rc<SourceImage>,
    pub quality: QualityFactor,
}

/// What happened to one run.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Still current: result stored and reported.
    Published(Rc<RecompressionResult>),
    /// Still current, but the run failed; any previous result was cleared.
    Failed(PipelineError),
    /// Superseded by `current`, or this generation was already settled.
    Stale {
        generation: Generation,
        current: Generation,
    },
    /// Nothing to run yet (no source selected).
    Idle,
}

impl Delivery {
    pub fn is_published(&self) -> bool {
        matches!(self, Delivery::Published(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Delivery::Stale { .. })
    }
}

type Listener = Rc<dyn Fn(Generation, Option<Rc<RecompressionResult>>)>;

#[derive(Debug)]
struct ControllerState {
    current: Generation,
    busy: bool,
    settled: bool,
    source: Option<Rc<SourceImage>>,
    quality: QualityFactor,
    published: Option<Rc<RecompressionResult>>,
    last_error: Option<PipelineError>,
}

/// Owns the current generation, the busy flag and the published result.
pub struct Controller<D, E> {
    pipeline: Pipeline<D, E>,
    state: RefCell<ControllerState>,
    listener: RefCell<Option<Listener>>,
}

impl<D: ImageDecoder, E: ImageEncoder> Controller<D, E> {
    /// Build a controller after validating `config`.
    pub fn new(decoder: D, encoder: E, config: CompressorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let quality = config.initial_quality();
        Ok(Self {
            pipeline: Pipeline::new(decoder, encoder, config),
            state: RefCell::new(ControllerState {
                current: Generation::default(),
                busy: false,
                settled: true,
                source: None,
                quality,
                published: None,
                last_error: None,
            }),
            listener: RefCell::new(None),
        })
    }

    /// Called once per settled (non-stale) generation, with `None` on failure.
    pub fn set_listener<F>(&self, listener: F)
    where
        F: Fn(Generation, Option<Rc<RecompressionResult>>) + 'static,
    {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn clear_listener(&self) {
        self.listener.borrow_mut().take();
    }

    /// Start a new generation for `(source, quality)` and mark the controller busy.
    ///
    /// Any run still in flight becomes stale from this point on. Callers
    /// record the pair in the state first.
    fn issue(&self, source: Rc<SourceImage>, quality: QualityFactor) -> Ticket {
        let mut state = self.state.borrow_mut();
        let generation = state.current.next();
        state.current = generation;
        state.busy = true;
        state.settled = false;
        tracing::debug!(%generation, %quality, "issued generation");
        Ticket {
            generation,
            source,
            quality,
        }
    }

    /// Make `(source, quality)` the current pair and issue a generation for it.
    ///
    /// Switching to a different source drops the published result
    /// immediately, since it describes another image.
    pub fn prepare_request(&self, source: Rc<SourceImage>, quality: QualityFactor) -> Ticket {
        {
            let mut state = self.state.borrow_mut();
            let same_source = state
                .source
                .as_ref()
                .is_some_and(|current| Rc::ptr_eq(current, &source));
            if !same_source {
                state.published = None;
                state.last_error = None;
            }
            state.source = Some(Rc::clone(&source));
            state.quality = quality;
        }
        self.issue(source, quality)
    }

    /// Replace the source and issue a generation at the current quality.
    pub fn prepare_source(&self, source: SourceImage) -> Ticket {
        let quality = self.state.borrow().quality;
        self.prepare_request(Rc::new(source), quality)
    }

    /// Clamp raw slider input into the configured range and store it.
    ///
    /// Returns a ticket when a source is selected; the previous result stays
    /// visible until the new one lands.
    pub fn prepare_quality(&self, value: f32) -> Option<Ticket> {
        let quality = self.pipeline.config().quality_range.clamp(value);
        let source = {
            let mut state = self.state.borrow_mut();
            state.quality = quality;
            state.source.clone()
        }?;
        Some(self.issue(source, quality))
    }

    /// Re-issue the current `(source, quality)` pair, if any.
    pub fn prepare_refresh(&self) -> Option<Ticket> {
        let (source, quality) = {
            let state = self.state.borrow();
            (state.source.clone()?, state.quality)
        };
        Some(self.issue(source, quality))
    }

    /// Run the pipeline for `ticket` and settle its outcome.
    pub async fn complete(&self, ticket: Ticket) -> Delivery {
        let outcome = self.pipeline.run(&ticket.source, ticket.quality).await;
        self.finish(ticket.generation, outcome)
    }

    /// Issue and run in one step. The generation is captured before the
    /// returned future is first polled.
    pub fn request(
        &self,
        source: Rc<SourceImage>,
        quality: QualityFactor,
    ) -> impl Future<Output = Delivery> + '_ {
        let ticket = self.prepare_request(source, quality);
        self.complete(ticket)
    }

    pub fn select_source(&self, source: SourceImage) -> impl Future<Output = Delivery> + '_ {
        let ticket = self.prepare_source(source);
        self.complete(ticket)
    }

    /// Resolves to [`Delivery::Idle`] when no source has been selected.
    pub fn set_quality(&self, value: f32) -> impl Future<Output = Delivery> + '_ {
        let ticket = self.prepare_quality(value);
        self.complete_optional(ticket)
    }

    pub fn refresh(&self) -> impl Future<Output = Delivery> + '_ {
        let ticket = self.prepare_refresh();
        self.complete_optional(ticket)
    }

    async fn complete_optional(&self, ticket: Option<Ticket>) -> Delivery {
        match ticket {
            Some(ticket) => self.complete(ticket).await,
            None => Delivery::Idle,
        }
    }

    fn finish(
        &self,
        generation: Generation,
        outcome: Result<RecompressionResult, PipelineError>,
    ) -> Delivery {
        let (delivery, published) = {
            let mut state = self.state.borrow_mut();
            if generation != state.current || state.settled {
                tracing::debug!(%generation, current = %state.current, "discarding stale result");
                return Delivery::Stale {
                    generation,
                    current: state.current,
                };
            }
            state.busy = false;
            state.settled = true;

            match outcome {
                Ok(result) => {
                    let result = Rc::new(result);
                    tracing::info!(
                        %generation,
                        bytes = result.byte_size(),
                        dimensions = %result.dimensions(),
                        quality = %result.quality(),
                        "published result"
                    );
                    state.published = Some(Rc::clone(&result));
                    state.last_error = None;
                    (Delivery::Published(Rc::clone(&result)), Some(result))
                }
                Err(err) => {
                    tracing::warn!(%generation, error = %err, "recompression failed");
                    state.published = None;
                    state.last_error = Some(err.clone());
                    (Delivery::Failed(err), None)
                }
            }
        };

        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(generation, published);
        }
        delivery
    }
}

impl<D, E> Controller<D, E> {
    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }

    /// The most recently published result, if the current state has one.
    pub fn latest(&self) -> Option<Rc<RecompressionResult>> {
        self.state.borrow().published.clone()
    }

    pub fn generation(&self) -> Generation {
        self.state.borrow().current
    }

    pub fn quality(&self) -> QualityFactor {
        self.state.borrow().quality
    }

    pub fn source(&self) -> Option<Rc<SourceImage>> {
        self.state.borrow().source.clone()
    }

    pub fn last_error(&self) -> Option<PipelineError> {
        self.state.borrow().last_error.clone()
    }

    pub fn config(&self) -> &CompressorConfig {
        self.pipeline.config()
    }

    /// Download name for the published result, using the quality it was encoded at.
    pub fn suggested_file_name(&self) -> Option<String> {
        let state = self.state.borrow();
        let source = state.source.as_ref()?;
        let result = state.published.as_ref()?;
        Some(suggested_file_name(&source.base_name(), result.quality()))
    }

    /// Original versus published sizes.
    pub fn stats(&self) -> Option<SizeStats> {
        let state = self.state.borrow();
        let source = state.source.as_ref()?;
        let result = state.published.as_ref()?;
        Some(SizeStats::new(
            source.byte_len() as u64,
            result.byte_size() as u64,
        ))
    }
}

impl<D, E> fmt::Debug for Controller<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("has_listener", &self.listener.borrow().is_some())
            .finish_non_exhaustive()
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::tests::{delayed, q, scripted, TestController};
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;
    use tokio::task::LocalSet;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap()
    }

    fn quality_for(index: usize) -> QualityFactor {
        q(0.2 + (index % 8) as f32 * 0.1)
    }

    /// Run every `(issue gap, decode latency)` pair concurrently and collect
    /// listener events plus the final generation.
    fn drive(plan: Vec<(u8, u8)>) -> (Vec<(Generation, bool)>, Vec<Delivery>, Generation) {
        let local = LocalSet::new();
        local.block_on(&runtime(), async move {
            let controller: Rc<TestController> = Rc::new(scripted());
            let events: Rc<RefCell<Vec<(Generation, bool)>>> = Rc::default();
            let sink = Rc::clone(&events);
            controller.set_listener(move |g, r| sink.borrow_mut().push((g, r.is_some())));

            let mut handles = Vec::new();
            for (index, (gap, latency)) in plan.into_iter().enumerate() {
                if gap > 0 {
                    tokio::time::sleep(Duration::from_millis(gap as u64)).await;
                }
                let controller = Rc::clone(&controller);
                let ticket = controller.prepare_request(delayed(latency), quality_for(index));
                handles.push(tokio::task::spawn_local(async move {
                    controller.complete(ticket).await
                }));
            }

            let mut deliveries = Vec::new();
            for handle in handles {
                deliveries.push(handle.await.unwrap());
            }
            let generation = controller.generation();
            let events = events.borrow().clone();
            (events, deliveries, generation)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: with every request issued before any completes, only the
        /// last generation is ever published.
        #[test]
        fn prop_burst_publishes_only_last(latencies in prop::collection::vec(1u8..=60, 1..10)) {
            let count = latencies.len();
            let plan = latencies.into_iter().map(|l| (0, l)).collect();
            let (events, deliveries, last) = drive(plan);

            prop_assert_eq!(events, vec![(last, true)]);
            for delivery in &deliveries[..count - 1] {
                prop_assert!(delivery.is_stale());
            }
            prop_assert!(deliveries[count - 1].is_published());
        }

        /// Property: with arbitrary issue gaps, published generations strictly
        /// increase and the last issued generation is always published.
        #[test]
        fn prop_published_generations_increase(
            plan in prop::collection::vec((0u8..=40, 1u8..=60), 1..10),
        ) {
            let (events, deliveries, last) = drive(plan);

            for pair in events.windows(2) {
                prop_assert!(pair[0].0 < pair[1].0);
            }
            prop_assert_eq!(events.last(), Some(&(last, true)));

            let published = deliveries.iter().filter(|d| d.is_published()).count();
            prop_assert_eq!(published, events.len());
        }
    }
}
