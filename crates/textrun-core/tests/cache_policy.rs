use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use textrun_core::{
    types::GlyphBox, FormattingContext, MeasurementSurface, ResolvedStyle, Run, TextMeasurer,
    TextRunError,
};

/// Reports fixed metrics, counts every call
struct CountingSurface {
    calls: Arc<AtomicUsize>,
    ascent: f32,
    descent: f32,
    char_width: f32,
}

impl CountingSurface {
    fn new(calls: Arc<AtomicUsize>) -> Self {
        Self {
            calls,
            ascent: 10.0,
            descent: 4.0,
            char_width: 10.0,
        }
    }
}

impl MeasurementSurface for CountingSurface {
    fn name(&self) -> &'static str {
        "counting-surface"
    }

    fn measure_glyph_box(
        &self,
        text: &str,
        _style: &ResolvedStyle,
    ) -> textrun_core::Result<GlyphBox> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GlyphBox {
            ascent: self.ascent,
            height: self.ascent + self.descent,
            width: text.chars().count() as f32 * self.char_width,
        })
    }
}

struct UnavailableSurface;

impl MeasurementSurface for UnavailableSurface {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn measure_glyph_box(
        &self,
        _text: &str,
        _style: &ResolvedStyle,
    ) -> textrun_core::Result<GlyphBox> {
        Err(TextRunError::MeasurementUnavailable("no document to measure in".into()))
    }
}

fn build_measurer() -> (TextMeasurer, Arc<AtomicUsize>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let calls = Arc::new(AtomicUsize::new(0));
    let measurer = TextMeasurer::new(Arc::new(CountingSurface::new(calls.clone())));
    (measurer, calls)
}

#[test]
fn second_measurement_hits_cache() {
    let (measurer, calls) = build_measurer();
    let ctx = FormattingContext::default();
    let run = Run::default().with_font("Georgia").with_size(12.0);

    let first = measurer.measure("hello world", Some(&run), &ctx).unwrap();
    let second = measurer.measure("hello world", Some(&run), &ctx).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.width.to_bits(), second.width.to_bits());
    assert_eq!(1, calls.load(Ordering::SeqCst), "surface should be asked once");
    assert_eq!(measurer.cache().stats().hits, 1);
}

#[test]
fn second_measurement_with_word_spacing_hits_cache() {
    let (measurer, calls) = build_measurer();
    let ctx = FormattingContext::default().with_word_spacing(150.0);

    let first = measurer.measure("spaced", None, &ctx).unwrap();
    assert_eq!(2, calls.load(Ordering::SeqCst), "text and reference glyph");

    let second = measurer.measure("spaced", None, &ctx).unwrap();
    assert_eq!(first, second);
    assert_eq!(2, calls.load(Ordering::SeqCst), "nothing new to measure");
}

#[test]
fn caches_can_be_disabled() {
    let (measurer, calls) = build_measurer();
    let ctx = FormattingContext::default().with_cache(false);

    measurer.measure("hello", None, &ctx).unwrap();
    measurer.measure("hello", None, &ctx).unwrap();

    assert_eq!(2, calls.load(Ordering::SeqCst), "cache off");
    assert!(measurer.cache().is_empty());
}

#[test]
fn disabled_cache_still_applies_adjustments() {
    let (measurer, calls) = build_measurer();
    let ctx = FormattingContext::default()
        .with_cache(false)
        .with_word_spacing(200.0)
        .with_line_height(150.0);

    let metrics = measurer.measure("abc", None, &ctx).unwrap();
    // 30px text, reference 10px -> 20px, +10px
    assert_eq!(metrics.width, 40.0);
    assert_eq!(metrics.ascent, 15.0);
    assert_eq!(metrics.descent, 6.0);
    assert_eq!(metrics.height, 21.0);
    assert_eq!(2, calls.load(Ordering::SeqCst));
}

#[test]
fn word_spacing_change_yields_new_width() {
    let (measurer, _calls) = build_measurer();
    let run = Run::default();

    let normal = FormattingContext::default().with_word_spacing(100.0);
    let wide = FormattingContext::default().with_word_spacing(200.0);

    let before = measurer.measure("text", Some(&run), &normal).unwrap();
    let after = measurer.measure("text", Some(&run), &wide).unwrap();

    assert_eq!(before.width, 40.0);
    assert_eq!(after.width, 50.0);
    assert_ne!(before.width, after.width, "stale width returned from cache");

    let back = measurer.measure("text", Some(&run), &normal).unwrap();
    assert_eq!(back.width, 40.0);
}

#[test]
fn negative_word_spacing_is_keyed_apart_from_zero() {
    let (measurer, _calls) = build_measurer();

    let zero = FormattingContext::default().with_word_spacing(0.0);
    let narrow = FormattingContext::default().with_word_spacing(-50.0);

    // reference 10px: 0% -> -10px, -50% -> -5px spaced, -15px
    let at_zero = measurer.measure("text", None, &zero).unwrap();
    let tightened = measurer.measure("text", None, &narrow).unwrap();
    assert_eq!(at_zero.width, 30.0);
    assert_eq!(tightened.width, 25.0);

    let (fresh, _) = build_measurer();
    assert_eq!(fresh.measure("text", None, &narrow).unwrap(), tightened);
}

#[test]
fn line_height_is_applied_on_every_read() {
    let (measurer, calls) = build_measurer();

    let plain = FormattingContext::default();
    let tall = FormattingContext::default().with_line_height(150.0);

    let raw = measurer.measure("line", None, &plain).unwrap();
    assert_eq!((raw.ascent, raw.descent, raw.height), (10.0, 4.0, 14.0));

    let scaled = measurer.measure("line", None, &tall).unwrap();
    assert_eq!((scaled.ascent, scaled.descent, scaled.height), (15.0, 6.0, 21.0));

    // the cached entry itself was never scaled
    let again = measurer.measure("line", None, &plain).unwrap();
    assert_eq!(again, raw);
    assert_eq!(1, calls.load(Ordering::SeqCst));
}

#[test]
fn independent_measurers_do_not_share_entries() {
    let calls = Arc::new(AtomicUsize::new(0));
    let surface: Arc<dyn MeasurementSurface> = Arc::new(CountingSurface::new(calls.clone()));
    let a = TextMeasurer::new(surface.clone());
    let b = TextMeasurer::new(surface);
    let ctx = FormattingContext::default();

    a.measure("same", None, &ctx).unwrap();
    b.measure("same", None, &ctx).unwrap();

    assert_eq!(2, calls.load(Ordering::SeqCst));
}

#[test]
fn swapped_store_survives_in_a_new_measurer() {
    let (measurer, calls) = build_measurer();
    let ctx = FormattingContext::default();
    measurer.measure("warm", None, &ctx).unwrap();

    let store = measurer.cache().swap(Default::default());
    let warmed = TextMeasurer::with_cache(
        Arc::new(CountingSurface::new(calls.clone())),
        textrun_core::MeasureCache::with_store(store),
    );
    warmed.measure("warm", None, &ctx).unwrap();

    assert_eq!(1, calls.load(Ordering::SeqCst));
}

#[test]
fn unavailable_host_is_reported() {
    let measurer = TextMeasurer::new(Arc::new(UnavailableSurface));
    let err = measurer
        .measure("anything", None, &FormattingContext::default())
        .unwrap_err();

    assert!(matches!(err, TextRunError::MeasurementUnavailable(_)));
    assert!(measurer.cache().is_empty());
}
