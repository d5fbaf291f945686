use tracing::debug;

pub const DEFAULT_THRESHOLD_PX: u32 = 1000;
pub const LISTING_THRESHOLD_PX: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentinelId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(pub u64);

pub trait IntersectionSource {
    fn observe(&mut self, sentinel: SentinelId, root_margin_px: u32) -> ObservationId;
    fn disconnect(&mut self, observation: ObservationId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    Observing,
    Fetching,
}

pub struct InfiniteScroll<S, F>
where
    S: IntersectionSource,
    F: FnMut(),
{
    source: S,
    fetch_next_page: F,
    threshold_px: u32,
    active: Option<ObservationId>,
    has_next_page: bool,
    is_fetching: bool,
}

impl<S, F> InfiniteScroll<S, F>
where
    S: IntersectionSource,
    F: FnMut(),
{
    pub fn new(source: S, fetch_next_page: F) -> Self {
        Self::with_threshold(source, fetch_next_page, DEFAULT_THRESHOLD_PX)
    }

    pub fn with_threshold(source: S, fetch_next_page: F, threshold_px: u32) -> Self {
        Self {
            source,
            fetch_next_page,
            threshold_px,
            active: None,
            has_next_page: false,
            is_fetching: false,
        }
    }

    pub fn state(&self) -> ScrollState {
        match (self.active, self.is_fetching) {
            (_, true) => ScrollState::Fetching,
            (Some(_), false) => ScrollState::Observing,
            (None, false) => ScrollState::Idle,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sync(&mut self, has_next_page: bool, is_fetching: bool) {
        self.has_next_page = has_next_page;
        self.is_fetching = is_fetching;
    }

    pub fn attach(&mut self, sentinel: Option<SentinelId>) {
        // Reconnecting never fetches by itself.
        if self.is_fetching {
            return;
        }
        self.disconnect();
        if let Some(sentinel) = sentinel {
            let id = self.source.observe(sentinel, self.threshold_px);
            debug!(?sentinel, ?id, "observing sentinel");
            self.active = Some(id);
        }
    }

    // Stale or mid-fetch reports are dropped, not queued.
    pub fn on_intersection(&mut self, observation: ObservationId, is_intersecting: bool) -> bool {
        if self.active != Some(observation) {
            return false;
        }
        if !is_intersecting || !self.has_next_page || self.is_fetching {
            return false;
        }
        self.is_fetching = true;
        (self.fetch_next_page)();
        true
    }

    pub fn teardown(&mut self) {
        self.disconnect();
    }

    fn disconnect(&mut self) {
        if let Some(id) = self.active.take() {
            self.source.disconnect(id);
        }
    }
}

impl<S, F> Drop for InfiniteScroll<S, F>
where
    S: IntersectionSource,
    F: FnMut(),
{
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        observed: Vec<(SentinelId, u32)>,
        connected: Vec<ObservationId>,
        next: u64,
    }

    #[derive(Clone, Default)]
    struct FakeViewport(Rc<RefCell<Log>>);

    impl IntersectionSource for FakeViewport {
        fn observe(&mut self, sentinel: SentinelId, root_margin_px: u32) -> ObservationId {
            let mut log = self.0.borrow_mut();
            log.next += 1;
            let id = ObservationId(log.next);
            log.observed.push((sentinel, root_margin_px));
            log.connected.push(id);
            id
        }

        fn disconnect(&mut self, observation: ObservationId) {
            self.0.borrow_mut().connected.retain(|id| *id != observation);
        }
    }

    fn current(viewport: &FakeViewport) -> ObservationId {
        *viewport.0.borrow().connected.last().expect("an active observation")
    }

    #[test]
    fn fetches_once_per_intersection_until_completion() {
        let viewport = FakeViewport::default();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut scroll = InfiniteScroll::new(viewport.clone(), move || {
            counter.set(counter.get() + 1)
        });
        scroll.sync(true, false);
        scroll.attach(Some(SentinelId(1)));
        assert_eq!(scroll.state(), ScrollState::Observing);
        let obs = current(&viewport);

        assert!(scroll.on_intersection(obs, true));
        assert_eq!(scroll.state(), ScrollState::Fetching);
        assert!(!scroll.on_intersection(obs, true));
        assert_eq!(calls.get(), 1);

        scroll.sync(true, false);
        assert_eq!(scroll.state(), ScrollState::Observing);
        assert!(scroll.on_intersection(obs, true));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn external_fetching_flag_suppresses_triggers() {
        let viewport = FakeViewport::default();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut scroll = InfiniteScroll::new(viewport.clone(), move || {
            counter.set(counter.get() + 1)
        });
        scroll.sync(true, false);
        scroll.attach(Some(SentinelId(1)));
        let obs = current(&viewport);

        scroll.sync(true, true);
        for _ in 0..3 {
            assert!(!scroll.on_intersection(obs, true));
        }
        assert_eq!(calls.get(), 0);

        scroll.sync(true, false);
        assert!(scroll.on_intersection(obs, true));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn no_fetch_without_next_page_or_visibility() {
        let viewport = FakeViewport::default();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut scroll = InfiniteScroll::new(viewport.clone(), move || {
            counter.set(counter.get() + 1)
        });
        scroll.attach(Some(SentinelId(1)));
        let obs = current(&viewport);

        scroll.sync(false, false);
        assert!(!scroll.on_intersection(obs, true));
        scroll.sync(true, false);
        assert!(!scroll.on_intersection(obs, false));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn reattach_disconnects_previous_and_ignores_stale_events() {
        let viewport = FakeViewport::default();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut scroll = InfiniteScroll::with_threshold(
            viewport.clone(),
            move || counter.set(counter.get() + 1),
            LISTING_THRESHOLD_PX,
        );
        scroll.sync(true, false);
        scroll.attach(Some(SentinelId(1)));
        let first = current(&viewport);
        scroll.attach(Some(SentinelId(2)));
        let second = current(&viewport);

        assert_eq!(viewport.0.borrow().connected, vec![second]);
        assert_eq!(
            viewport.0.borrow().observed,
            vec![(SentinelId(1), 800), (SentinelId(2), 800)]
        );
        assert_eq!(calls.get(), 0);

        assert!(!scroll.on_intersection(first, true));
        assert!(scroll.on_intersection(second, true));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn attach_while_fetching_keeps_current_observation() {
        let viewport = FakeViewport::default();
        let mut scroll = InfiniteScroll::new(viewport.clone(), || {});
        scroll.sync(true, false);
        scroll.attach(Some(SentinelId(1)));
        let obs = current(&viewport);
        scroll.sync(true, true);
        scroll.attach(Some(SentinelId(2)));
        assert_eq!(viewport.0.borrow().connected, vec![obs]);
        assert_eq!(viewport.0.borrow().observed.len(), 1);
    }

    #[test]
    fn attaching_nothing_goes_idle() {
        let viewport = FakeViewport::default();
        let mut scroll = InfiniteScroll::new(viewport.clone(), || {});
        scroll.attach(Some(SentinelId(1)));
        scroll.attach(None);
        assert_eq!(scroll.state(), ScrollState::Idle);
        assert!(viewport.0.borrow().connected.is_empty());
    }

    #[test]
    fn teardown_and_drop_disconnect() {
        let viewport = FakeViewport::default();
        {
            let mut scroll = InfiniteScroll::new(viewport.clone(), || {});
            scroll.attach(Some(SentinelId(1)));
            scroll.teardown();
            assert_eq!(scroll.state(), ScrollState::Idle);
            scroll.attach(Some(SentinelId(2)));
        }
        assert!(viewport.0.borrow().connected.is_empty());
        assert_eq!(viewport.0.borrow().observed.len(), 2);
    }
}
