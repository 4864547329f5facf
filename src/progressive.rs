//! Step-at-a-time passes that fill an output buffer for animated display.
//!
//! Each pass owns its accumulator and is advanced by the caller one
//! coordinate per [`step`](ConvolutionPass::step). Changing any parameter
//! means building a new pass; passes keep no state between runs.

use crate::candidate::{select_matches, MatchFilter, MatchPeak};
use crate::convolve::{trace_at as convolve_trace_at, ConvolutionTrace};
use crate::image::luma::LumaPlane;
use crate::image::{Position, Raster, Rgba};
use crate::kernel::Kernel;
use crate::metric::{valid_grid, Metric};
use crate::search::offset::{trace_at as match_trace_at, MatchTrace};
use crate::template::TemplatePlan;
use crate::util::ConvMatchResult;

/// Result of advancing a pass by one coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<T> {
    /// Coordinate that was just written.
    pub position: Position,
    /// Trace of the value written there.
    pub trace: T,
}

/// Integer percentage of `done` out of `total`, rounded down.
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done * 100 / total) as u8
}

/// Progressive convolution in raster order.
///
/// The accumulator starts as a copy of the source. Once every pixel has been
/// stepped it equals [`crate::convolve::apply_kernel`] with the same kernel
/// and normalize flag.
pub struct ConvolutionPass<'a> {
    source: &'a Raster,
    kernel: Kernel,
    buffer: Raster,
    next: usize,
}

impl<'a> ConvolutionPass<'a> {
    pub fn new(source: &'a Raster, kernel: &Kernel, normalize: bool) -> Self {
        Self {
            source,
            kernel: kernel.prepared(normalize).into_owned(),
            buffer: source.clone(),
            next: 0,
        }
    }

    fn total(&self) -> usize {
        self.source.width() * self.source.height()
    }

    /// Computes and writes the next pixel; `None` once the pass is complete.
    pub fn step(&mut self) -> Option<Step<ConvolutionTrace>> {
        if self.is_complete() {
            return None;
        }
        let width = self.source.width();
        let (x, y) = (self.next % width, self.next / width);
        let trace = convolve_trace_at(self.source, &self.kernel, x, y);
        let alpha = self.source.pixel(x, y).a;
        self.buffer.put(x, y, trace.result.with_alpha(alpha));
        self.next += 1;
        Some(Step {
            position: Position::new(x, y),
            trace,
        })
    }

    /// Steps until the pass is complete.
    pub fn run_to_end(&mut self) {
        while self.step().is_some() {}
    }

    /// Accumulator in its current, possibly partial, state.
    pub fn current(&self) -> &Raster {
        &self.buffer
    }

    /// Completed share of pixels in percent.
    pub fn progress(&self) -> u8 {
        percent(self.next, self.total())
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.total()
    }

    /// Consumes the pass and returns its accumulator.
    pub fn output(self) -> Raster {
        self.buffer
    }

    /// Restarts from `(0, 0)` with a fresh copy of the source.
    pub fn reset(&mut self) {
        self.buffer = self.source.clone();
        self.next = 0;
    }
}

/// Progressive template matching over the valid offset grid.
///
/// Offsets are visited left to right, top to bottom. Each written value is
/// the context-free [`Metric::display_fixed`] of the offset's score, so SSD
/// and SAD buffers generally differ from the full-pass heat map.
pub struct MatchPass {
    image: LumaPlane,
    tpl: TemplatePlan,
    metric: Metric,
    valid_width: usize,
    valid_height: usize,
    buffer: Raster,
    peaks: Vec<MatchPeak>,
    next: usize,
}

impl MatchPass {
    /// Fails with `InvalidTemplateSize` when the template does not fit.
    pub fn new(source: &Raster, template: &Raster, metric: Metric) -> ConvMatchResult<Self> {
        let image = LumaPlane::from_raster(source);
        let tpl = TemplatePlan::from_raster(template);
        let (valid_width, valid_height) = valid_grid(&image, &tpl)?;
        let buffer = Raster::filled(source.width(), source.height(), Rgba::gray(0))?;
        Ok(Self {
            image,
            tpl,
            metric,
            valid_width,
            valid_height,
            buffer,
            peaks: Vec::with_capacity(valid_width * valid_height),
            next: 0,
        })
    }

    fn total(&self) -> usize {
        self.valid_width * self.valid_height
    }

    /// Scores and writes the next offset; `None` once the pass is complete.
    pub fn step(&mut self) -> Option<Step<MatchTrace>> {
        if self.is_complete() {
            return None;
        }
        let (x, y) = (self.next % self.valid_width, self.next / self.valid_width);
        let trace = match_trace_at(&self.image, &self.tpl, self.metric, x, y);
        self.buffer.put(x, y, Rgba::gray(trace.normalized_score));
        self.peaks.push(MatchPeak {
            x,
            y,
            value: trace.normalized_score,
            score: trace.score,
        });
        self.next += 1;
        Some(Step {
            position: Position::new(x, y),
            trace,
        })
    }

    /// Steps until the pass is complete.
    pub fn run_to_end(&mut self) {
        while self.step().is_some() {}
    }

    pub fn current(&self) -> &Raster {
        &self.buffer
    }

    /// Completed share of offsets in percent.
    pub fn progress(&self) -> u8 {
        percent(self.next, self.total())
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.total()
    }

    pub fn output(self) -> Raster {
        self.buffer
    }

    /// Offsets visited so far, in visiting order.
    pub fn visited(&self) -> &[MatchPeak] {
        &self.peaks
    }

    /// Best visited offsets by displayed value.
    pub fn matches(&self, filter: &MatchFilter) -> Vec<MatchPeak> {
        select_matches(self.peaks.iter().copied(), filter)
    }
}
