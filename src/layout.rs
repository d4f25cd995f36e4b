use std::collections::HashMap;

/// Bounding box of the scroll container, in whatever vertical unit the host
/// renders with (terminal rows here, pixels elsewhere).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerGeometry {
    pub top: f64,
    pub height: f64,
}

/// Ticket for an in-flight geometry measurement. Applying it against a table
/// whose generation has moved on is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureRequest {
    generation: u64,
}

/// Per-line scroll offsets derived from rendered geometry.
///
/// Measurement is asynchronous: the host requests a ticket via
/// [`begin_measure`](OffsetTable::begin_measure), measures on a later tick,
/// and reports back through [`apply`](OffsetTable::apply). Any change to the
/// line list or the container geometry invalidates the table; stale reports
/// are discarded by the generation check. Lines that were never measured
/// read as offset `0.0`.
#[derive(Debug)]
pub struct OffsetTable {
    offsets: HashMap<usize, f64>,
    generation: u64,
    space_top: f64,
}

impl OffsetTable {
    /// `space_top` is the fraction of the container height at which the
    /// active line should rest, clamped to `[0, 1]`.
    pub fn new(space_top: f64) -> Self {
        Self {
            offsets: HashMap::new(),
            generation: 0,
            space_top: space_top.clamp(0.0, 1.0),
        }
    }

    /// Drop all offsets and start a new generation. Call when the line list
    /// changes or the container is resized/re-laid-out.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.offsets.clear();
    }

    pub fn begin_measure(&self) -> MeasureRequest {
        MeasureRequest {
            generation: self.generation,
        }
    }

    /// Apply a measurement report. `line_tops` may cover any subset of lines;
    /// entries already present for other lines are kept. Returns false if the
    /// report was stale.
    pub fn apply(
        &mut self,
        request: MeasureRequest,
        container: ContainerGeometry,
        line_tops: &[(usize, f64)],
    ) -> bool {
        if request.generation != self.generation {
            tracing::trace!(
                stale = request.generation,
                current = self.generation,
                "discarding stale geometry measurement"
            );
            return false;
        }

        let anchor = container.top + container.height * self.space_top;
        for &(index, top) in line_tops {
            self.offsets.insert(index, top - anchor);
        }
        true
    }

    /// Offset that places the line at the space-top anchor; `0.0` when the
    /// line was never measured.
    pub fn offset_for(&self, index: usize) -> f64 {
        self.offsets.get(&index).copied().unwrap_or(0.0)
    }

    pub fn space_top(&self) -> f64 {
        self.space_top
    }

    pub fn measured(&self) -> usize {
        self.offsets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: ContainerGeometry = ContainerGeometry {
        top: 0.0,
        height: 10.0,
    };

    #[test]
    fn test_offset_formula() {
        let mut table = OffsetTable::new(0.4);
        let req = table.begin_measure();
        assert!(table.apply(req, CONTAINER, &[(0, 0.0), (1, 6.0)]));
        // anchor = 10 * 0.4 = 4
        assert_eq!(table.offset_for(0), -4.0);
        assert_eq!(table.offset_for(1), 2.0);
    }

    #[test]
    fn test_missing_line_defaults_to_zero() {
        let mut table = OffsetTable::new(0.4);
        let req = table.begin_measure();
        table.apply(req, CONTAINER, &[(0, 5.0)]);
        assert_eq!(table.offset_for(0), 1.0);
        assert_eq!(table.offset_for(7), 0.0);
    }

    #[test]
    fn test_partial_reports_accumulate() {
        let mut table = OffsetTable::new(0.0);
        let req = table.begin_measure();
        table.apply(req, CONTAINER, &[(0, 1.0)]);
        table.apply(req, CONTAINER, &[(1, 2.0)]);
        assert_eq!(table.offset_for(0), 1.0);
        assert_eq!(table.offset_for(1), 2.0);
    }

    #[test]
    fn test_stale_report_discarded() {
        let mut table = OffsetTable::new(0.0);
        let req = table.begin_measure();
        table.invalidate();
        assert!(!table.apply(req, CONTAINER, &[(0, 5.0)]));
        assert_eq!(table.offset_for(0), 0.0);
    }

    #[test]
    fn test_space_top_clamped() {
        assert_eq!(OffsetTable::new(2.0).space_top(), 1.0);
        assert_eq!(OffsetTable::new(-0.5).space_top(), 0.0);
    }
}
