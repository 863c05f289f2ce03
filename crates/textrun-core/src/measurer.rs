//! The measurer callers actually talk to
//!
//! [`TextMeasurer`] pairs a host [`MeasurementSurface`] with its own
//! [`MeasureCache`]. A lookup goes:
//!
//! 1. resolve the run against the formatting context
//! 2. find (or produce) raw metrics with word spacing applied
//! 3. apply line height to a copy and return it
//!
//! The reference glyph used by the word-spacing correction is looked up
//! through the same cache, keyed without word spacing.

use std::sync::Arc;

use crate::{
    cache::{MeasureCache, MeasureKey},
    context::FormattingContext,
    error::Result,
    measure::{apply_word_spacing, measure_raw_adjusted, measure_raw_unadjusted, REFERENCE_GLYPH},
    style::ResolvedStyle,
    traits::MeasurementSurface,
    types::{Run, TextMetrics},
};

/// Cached text measurement over one host surface
pub struct TextMeasurer {
    surface: Arc<dyn MeasurementSurface>,
    cache: MeasureCache,
}

impl TextMeasurer {
    /// A measurer with an empty cache of its own
    pub fn new(surface: Arc<dyn MeasurementSurface>) -> Self {
        Self::with_cache(surface, MeasureCache::new())
    }

    pub fn with_cache(surface: Arc<dyn MeasurementSurface>, cache: MeasureCache) -> Self {
        log::debug!("text measurer created over {}", surface.name());
        Self { surface, cache }
    }

    /// Measure `text` styled as `run`
    pub fn measure(
        &self,
        text: &str,
        run: Option<&Run>,
        ctx: &FormattingContext,
    ) -> Result<TextMetrics> {
        let style = ResolvedStyle::resolve(run, ctx);
        self.measure_style(text, &style, ctx)
    }

    /// Measure `text` with an already resolved style
    pub fn measure_style(
        &self,
        text: &str,
        style: &ResolvedStyle,
        ctx: &FormattingContext,
    ) -> Result<TextMetrics> {
        let raw = self.raw_adjusted(text, style, ctx)?;
        Ok(raw.with_line_height(ctx.line_height))
    }

    /// The host surface measurements go to
    pub fn surface(&self) -> &Arc<dyn MeasurementSurface> {
        &self.surface
    }

    pub fn cache(&self) -> &MeasureCache {
        &self.cache
    }

    /// Discard every cached measurement
    pub fn reset_cache(&self) -> usize {
        self.cache.reset()
    }

    fn raw_adjusted(
        &self,
        text: &str,
        style: &ResolvedStyle,
        ctx: &FormattingContext,
    ) -> Result<TextMetrics> {
        if !ctx.use_cache {
            return measure_raw_adjusted(self.surface.as_ref(), text, style, ctx.word_spacing);
        }

        let Some(percent) = ctx.word_spacing else {
            return self.cached_unadjusted(text, style);
        };

        let key = MeasureKey::new(text, style, Some(percent));
        self.cache.get_or_try_insert_with(key, || {
            let metrics = self.cached_unadjusted(text, style)?;
            let reference = self.cached_unadjusted(REFERENCE_GLYPH, style)?;
            Ok(TextMetrics {
                width: apply_word_spacing(metrics.width, reference.width, percent),
                ..metrics
            })
        })
    }

    fn cached_unadjusted(&self, text: &str, style: &ResolvedStyle) -> Result<TextMetrics> {
        let key = MeasureKey::new(text, style, None);
        self.cache.get_or_try_insert_with(key, || {
            measure_raw_unadjusted(self.surface.as_ref(), text, style)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GlyphBox, Script};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSurface {
        calls: Arc<AtomicUsize>,
    }

    impl MeasurementSurface for CountingSurface {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn measure_glyph_box(&self, text: &str, style: &ResolvedStyle) -> Result<GlyphBox> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GlyphBox {
                ascent: style.size,
                height: style.size + 4.0,
                width: text.chars().count() as f32 * style.size,
            })
        }
    }

    fn measurer() -> (TextMeasurer, Arc<AtomicUsize>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let calls = Arc::new(AtomicUsize::new(0));
        let surface = CountingSurface {
            calls: calls.clone(),
        };
        (TextMeasurer::new(Arc::new(surface)), calls)
    }

    #[test]
    fn reference_glyph_is_cached_across_texts() {
        let (measurer, calls) = measurer();
        let ctx = FormattingContext::default().with_word_spacing(120.0);

        measurer.measure("one", None, &ctx).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // only "two" is new; "O" comes from the cache
        measurer.measure("two", None, &ctx).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn reference_glyph_text_is_measured_once() {
        let (measurer, calls) = measurer();
        let ctx = FormattingContext::default().with_word_spacing(120.0);

        measurer.measure("O", None, &ctx).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // the unadjusted entry serves plain lookups too
        measurer.measure("word", None, &ctx).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn style_changes_miss_the_cache() {
        let (measurer, calls) = measurer();
        let ctx = FormattingContext::default();

        measurer.measure("abc", None, &ctx).unwrap();
        measurer
            .measure("abc", Some(&Run::default().with_italic(true)), &ctx)
            .unwrap();
        measurer
            .measure("abc", Some(&Run::default().with_size(20.0)), &ctx)
            .unwrap();
        measurer
            .measure("abc", Some(&Run::default().with_script(Script::Super)), &ctx)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn color_does_not_affect_the_key() {
        let (measurer, calls) = measurer();
        let ctx = FormattingContext::default();

        measurer.measure("abc", None, &ctx).unwrap();
        measurer
            .measure("abc", Some(&Run::default().with_color("red")), &ctx)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reset_forces_remeasurement() {
        let (measurer, calls) = measurer();
        let ctx = FormattingContext::default();

        measurer.measure("abc", None, &ctx).unwrap();
        assert_eq!(measurer.reset_cache(), 1);
        measurer.measure("abc", None, &ctx).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(measurer.cache().stats().entries, 1);
    }
}
