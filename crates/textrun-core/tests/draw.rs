use textrun_core::{
    draw, traits::TextAlign, traits::TextBaseline, DrawBox, DrawSurface, FormattingContext,
    ResolvedStyle, Run, Script, ENTER,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    FillColor(String),
    Font(String),
    Align(TextAlign),
    Baseline(TextBaseline),
    Text(String, f32, f32),
    Rect(f32, f32, f32, f32),
}

#[derive(Default)]
struct CallLog {
    calls: Vec<Call>,
}

impl CallLog {
    fn texts(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Text(..)))
            .collect()
    }

    fn rects(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Rect(..)))
            .collect()
    }
}

impl DrawSurface for CallLog {
    fn set_fill_color(&mut self, color: &str) {
        self.calls.push(Call::FillColor(color.to_string()));
    }

    fn set_font(&mut self, style: &ResolvedStyle) {
        self.calls.push(Call::Font(style.font_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.calls.push(Call::Align(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.calls.push(Call::Baseline(baseline));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> textrun_core::Result<()> {
        self.calls.push(Call::Text(text.to_string(), x, y));
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> textrun_core::Result<()> {
        self.calls.push(Call::Rect(x, y, width, height));
        Ok(())
    }
}

fn placement() -> DrawBox {
    DrawBox {
        left: 20.0,
        baseline: 100.0,
        width: 64.0,
        ascent: 12.0,
        descent: 4.0,
    }
}

#[test]
fn style_is_applied_before_drawing() {
    let mut surface = CallLog::default();
    let run = Run::default().with_color("#0000ff").with_bold(true);
    draw(&mut surface, "Hi", &run, &FormattingContext::default(), placement()).unwrap();

    assert_eq!(
        surface.calls,
        vec![
            Call::Align(TextAlign::Left),
            Call::Baseline(TextBaseline::Alphabetic),
            Call::FillColor("#0000ff".into()),
            Call::Font("bold  10pt Arial".into()),
            Call::Text("Hi".into(), 20.0, 100.0),
        ]
    );
}

#[test]
fn superscript_raises_baseline_by_a_third_of_ascent() {
    let mut surface = CallLog::default();
    let run = Run::default().with_script(Script::Super);
    draw(&mut surface, "2", &run, &FormattingContext::default(), placement()).unwrap();

    assert_eq!(surface.texts(), vec![&Call::Text("2".into(), 20.0, 96.0)]);
}

#[test]
fn subscript_lowers_baseline_by_half_descent() {
    let mut surface = CallLog::default();
    let run = Run::default().with_script(Script::Sub);
    draw(&mut surface, "i", &run, &FormattingContext::default(), placement()).unwrap();

    assert_eq!(surface.texts(), vec![&Call::Text("i".into(), 20.0, 102.0)]);
}

#[test]
fn line_break_draws_placeholder() {
    let mut surface = CallLog::default();
    draw(&mut surface, "\n", &Run::default(), &FormattingContext::default(), placement()).unwrap();

    assert_eq!(surface.texts(), vec![&Call::Text(ENTER.to_string(), 20.0, 100.0)]);
}

#[test]
fn underline_sits_one_pixel_below_baseline() {
    let mut surface = CallLog::default();
    let run = Run::default().with_underline(true);
    draw(&mut surface, "under", &run, &FormattingContext::default(), placement()).unwrap();

    assert_eq!(surface.rects(), vec![&Call::Rect(20.0, 101.0, 64.0, 1.0)]);
}

#[test]
fn strikeout_sits_half_an_ascent_higher() {
    let mut surface = CallLog::default();
    let run = Run::default().with_strikeout(true);
    draw(&mut surface, "struck", &run, &FormattingContext::default(), placement()).unwrap();

    assert_eq!(surface.rects(), vec![&Call::Rect(20.0, 95.0, 64.0, 1.0)]);
}

#[test]
fn decorations_follow_shifted_baseline() {
    let mut surface = CallLog::default();
    let run = Run::default()
        .with_script(Script::Super)
        .with_underline(true)
        .with_strikeout(true);
    draw(&mut surface, "x", &run, &FormattingContext::default(), placement()).unwrap();

    assert_eq!(
        surface.rects(),
        vec![
            &Call::Rect(20.0, 97.0, 64.0, 1.0),
            &Call::Rect(20.0, 91.0, 64.0, 1.0),
        ]
    );
}
