//! A session bound to a map widget
//!
//! While a [`SessionView`] exists its session receives the widget's clicks.
//! Dropping the view drops its [`ClickSubscription`], which detaches it.

use super::map::{ClickSubscription, MapWidget};
use super::{Pending, RideSession, Slot};
use crate::error::{Error, Result};
use crate::geo::GeoBackend;
use crate::route::RouteBackend;
use tracing::debug;

#[derive(Debug)]
pub struct SessionView<G, R> {
    session: RideSession<G, R>,
    clicks: ClickSubscription,
}

impl<G: GeoBackend, R: RouteBackend> SessionView<G, R> {
    /// Attach a session to a widget
    pub fn activate(session: RideSession<G, R>, widget: &MapWidget) -> Self {
        Self {
            session,
            clicks: widget.subscribe(),
        }
    }

    pub fn session(&self) -> &RideSession<G, R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut RideSession<G, R> {
        &mut self.session
    }

    /// Apply every click received so far
    ///
    /// Out-of-region clicks are skipped; any other error stops the drain.
    /// Returns the slots that were filled, in order.
    pub async fn pump(&mut self) -> Result<Vec<Slot>> {
        let pending = self.pump_deferred()?;
        Ok(self.session.settle(pending).await)
    }

    /// [`pump`](Self::pump) without running the route request
    ///
    /// Only the last ticket issued during the drain is kept; earlier ones
    /// are already stale.
    pub fn pump_deferred(&mut self) -> Result<Pending<Vec<Slot>>> {
        let mut filled = Vec::new();
        let mut ticket = None;
        while let Some(coords) = self.clicks.try_next() {
            match self.session.click_map_deferred(coords) {
                Ok(pending) => {
                    filled.extend(pending.value);
                    ticket = pending.ticket.or(ticket);
                }
                Err(Error::OutOfBounds { lat, lng }) => {
                    debug!(lat, lng, "skipping click outside region");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Pending {
            value: filled,
            ticket,
        })
    }

    /// Detach from the widget and hand back the session
    pub fn into_session(self) -> RideSession<G, R> {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::resolver::LocationResolver;
    use crate::geo::{Bounds, Coordinates};
    use crate::session::SessionState;
    use crate::storage::MemoryStore;
    use crate::testing::{StubGeocoder, StubRouter};
    use std::sync::Arc;

    fn view(widget: &MapWidget) -> SessionView<StubGeocoder, StubRouter> {
        let resolver = LocationResolver::new(StubGeocoder::new(), Bounds::default(), 3);
        let session = RideSession::new(
            resolver,
            StubRouter::with_distance(8.0),
            Arc::new(MemoryStore::new()),
        );
        SessionView::activate(session, widget)
    }

    #[tokio::test]
    async fn test_pump_applies_clicks() {
        let widget = MapWidget::new();
        let mut view = view(&widget);

        widget.emit_click(Coordinates::new(10.0, 60.0));
        widget.emit_click(Coordinates::new(12.9716, 77.5946));
        widget.emit_click(Coordinates::new(12.9352, 77.6245));

        let filled = view.pump().await.unwrap();

        assert_eq!(filled, vec![Slot::Pickup, Slot::Drop]);
        assert_eq!(view.session().state(), SessionState::Ready);
        assert_eq!(view.session().distance_km(), Some(8.0));
    }

    #[tokio::test]
    async fn test_pump_deferred_hands_back_ticket() {
        let widget = MapWidget::new();
        let mut view = view(&widget);

        widget.emit_click(Coordinates::new(12.9716, 77.5946));
        widget.emit_click(Coordinates::new(12.9352, 77.6245));
        widget.emit_click(Coordinates::new(13.0, 77.6));

        let pending = view.pump_deferred().unwrap();
        assert_eq!(pending.value, vec![Slot::Pickup, Slot::Drop]);
        assert!(view.session().is_loading());

        let ticket = pending.ticket.unwrap();
        let result = view.session().estimator().estimate(&ticket).await;
        assert!(view.session_mut().apply_estimate(ticket, result));
        assert_eq!(view.session().distance_km(), Some(8.0));
    }

    #[tokio::test]
    async fn test_dropped_view_stops_listening() {
        let widget = MapWidget::new();
        {
            let _view = view(&widget);
            assert_eq!(widget.subscriber_count(), 1);
        }
        assert_eq!(widget.subscriber_count(), 0);
        assert_eq!(widget.emit_click(Coordinates::new(20.0, 78.0)), 0);
    }

    #[tokio::test]
    async fn test_into_session_detaches() {
        let widget = MapWidget::new();
        let session = view(&widget).into_session();

        assert_eq!(widget.subscriber_count(), 0);
        assert_eq!(session.state(), SessionState::Empty);
    }
}
