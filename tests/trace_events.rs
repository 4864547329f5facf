#![cfg(feature = "tracing")]

use convmatch::image::synth::gradient;
use convmatch::{apply_point_op, convolve, convolve_sobel_combined, Kernel, PointOp};
use std::sync::{Arc, Mutex};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

/// Records the names of every event it sees.
#[derive(Clone, Default)]
struct EventNames(Arc<Mutex<Vec<&'static str>>>);

impl EventNames {
    fn take(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl Subscriber for EventNames {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        self.0.lock().unwrap().push(event.metadata().name());
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

#[test]
fn full_image_passes_report_completion() {
    let source = gradient(9, 6).unwrap();
    let names = EventNames::default();

    tracing::subscriber::with_default(names.clone(), || {
        convolve(&source, &Kernel::box_blur(3).unwrap(), true);
        assert_eq!(names.take(), vec!["convolve_done"]);

        convolve_sobel_combined(&source);
        assert_eq!(names.take(), vec!["sobel_combined_done"]);

        apply_point_op(&source, &PointOp::Invert);
        assert_eq!(names.take(), vec!["point_op_done"]);
    });
}
