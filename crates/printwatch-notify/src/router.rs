//! Event routing -- which [`Feature`] an event name requires.

use printwatch_types::{event, EventPayload, Feature};

/// Resolve the feature required to dispatch `event_name`.
///
/// Returns `None` for event names that are not dispatchable; callers
/// must no-op immediately in that case. The payload is accepted for
/// future routing decisions but no current rule inspects it.
pub fn feature_for_event(event_name: &str, _event_payload: &EventPayload) -> Option<Feature> {
    match event_name {
        event::PRINT_DONE | event::PRINT_FAILED => Some(Feature::NotifyOnPrintDone),
        event::PRINT_CANCELLED => Some(Feature::NotifyOnPrintCancelled),
        event::FILAMENT_CHANGE => Some(Feature::NotifyOnFilamentChange),
        event::HEATER_COOLED_DOWN | event::HEATER_TARGET_REACHED => {
            Some(Feature::NotifyOnHeaterStatus)
        }
        // Reserved until progress notifications get their own feature
        // flag and throttling.
        event::PRINT_PROGRESS => None,
        name if event::OTHER_PRINT_EVENTS.contains(&name) => Some(Feature::NotifyOnOtherEvents),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> EventPayload {
        EventPayload::new()
    }

    #[test]
    fn terminal_events_route_to_print_done() {
        assert_eq!(
            feature_for_event(event::PRINT_DONE, &payload()),
            Some(Feature::NotifyOnPrintDone)
        );
        assert_eq!(
            feature_for_event(event::PRINT_FAILED, &payload()),
            Some(Feature::NotifyOnPrintDone)
        );
    }

    #[test]
    fn cancelled_and_filament_route_to_their_features() {
        assert_eq!(
            feature_for_event(event::PRINT_CANCELLED, &payload()),
            Some(Feature::NotifyOnPrintCancelled)
        );
        assert_eq!(
            feature_for_event(event::FILAMENT_CHANGE, &payload()),
            Some(Feature::NotifyOnFilamentChange)
        );
    }

    #[test]
    fn heater_events_share_one_feature() {
        for name in [event::HEATER_COOLED_DOWN, event::HEATER_TARGET_REACHED] {
            assert_eq!(
                feature_for_event(name, &payload()),
                Some(Feature::NotifyOnHeaterStatus)
            );
        }
    }

    #[test]
    fn lifecycle_events_route_to_other_events() {
        for name in event::OTHER_PRINT_EVENTS {
            assert_eq!(
                feature_for_event(name, &payload()),
                Some(Feature::NotifyOnOtherEvents)
            );
        }
    }

    #[test]
    fn progress_is_reserved() {
        assert_eq!(feature_for_event(event::PRINT_PROGRESS, &payload()), None);
    }

    #[test]
    fn unknown_events_are_not_dispatchable() {
        assert_eq!(feature_for_event("FirmwareUpdated", &payload()), None);
        assert_eq!(feature_for_event("", &payload()), None);
    }
}
