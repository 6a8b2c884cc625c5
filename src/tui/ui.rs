//! Frame composition: carves the terminal into the title bar, the
//! traffic log (or the error view), and the form row, then places each
//! component inside its slot honoring the shared layout props.

use crate::core::common::CommonProps;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageLog, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect, Size};
use ratatui::widgets::{Block, Paragraph};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let form_height = form_row_height(tui, frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(form_height)]);
    let [title_area, main_area, form_area] = layout.areas(frame.area());

    // Main area - show error OR the traffic log
    if let Some(error_msg) = &app.error {
        draw_error_view(frame, main_area, error_msg);
    } else {
        let mut log = MessageLog {
            state: &mut tui.message_log,
            transcript: &app.transcript,
        };
        log.render(frame, main_area);
    }

    let mut title_bar = TitleBar::new(
        app.backend_name.clone(),
        app.status_message.clone(),
        app.connected,
    );
    title_bar.render(frame, title_area);

    draw_form_row(frame, form_area, tui);
}

/// Width the button column needs: the button's own width plus its
/// horizontal margins.
fn button_column_width(tui: &TuiState) -> u16 {
    tui.send_button.desired_width()
        + tui.send_button.common.effective_margin_left()
        + tui.send_button.common.effective_margin_right()
}

/// Height of the form row: whatever the taller of the editor and the
/// button wants, margins included.
fn form_row_height(tui: &TuiState, frame_width: u16) -> u16 {
    let editor_props = &tui.text_input.common;
    let editor_width = frame_width
        .saturating_sub(button_column_width(tui))
        .saturating_sub(editor_props.effective_margin_left() + editor_props.effective_margin_right());
    let editor_height = tui.text_input.desired_height(editor_width)
        + editor_props.effective_margin_top()
        + editor_props.effective_margin_bottom();

    let button_props = &tui.send_button.common;
    let button_height = tui.send_button.desired_height()
        + button_props.effective_margin_top()
        + button_props.effective_margin_bottom();

    editor_height.max(button_height)
}

fn draw_form_row(frame: &mut Frame, area: Rect, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let layout = Layout::horizontal([Min(0), Length(button_column_width(tui))]);
    let [editor_slot, button_slot] = layout.areas(area);

    let editor_props = &tui.text_input.common;
    let editor_width = editor_slot
        .width
        .saturating_sub(editor_props.effective_margin_left() + editor_props.effective_margin_right());
    let editor_natural = Size::new(editor_width, tui.text_input.desired_height(editor_width));
    let editor_area = layout_slot(&tui.text_input.common, editor_slot, editor_natural);
    tui.text_input.render(frame, editor_area);

    let button_natural = Size::new(
        tui.send_button.desired_width(),
        tui.send_button.desired_height(),
    );
    let button_area = layout_slot(&tui.send_button.common, button_slot, button_natural);
    tui.send_button.render(frame, button_area);
}

/// Places a component inside its slot.
///
/// Margins carve the slot down first. On each axis the component then
/// either stretches across what is left (`align` absent) or takes its
/// natural size, clamped between the shared minimum and the slot, and
/// sits at the alignment fraction (0.0 = leading edge, 1.0 = trailing).
pub(crate) fn layout_slot(props: &CommonProps, slot: Rect, natural: Size) -> Rect {
    let left = props.effective_margin_left().min(slot.width);
    let right = props
        .effective_margin_right()
        .min(slot.width.saturating_sub(left));
    let top = props.effective_margin_top().min(slot.height);
    let bottom = props
        .effective_margin_bottom()
        .min(slot.height.saturating_sub(top));

    let inner = Rect {
        x: slot.x + left,
        y: slot.y + top,
        width: slot.width - left - right,
        height: slot.height - top - bottom,
    };

    let (x, width) = place_axis(
        inner.x,
        inner.width,
        natural.width.max(props.min_width),
        props.align_x,
    );
    let (y, height) = place_axis(
        inner.y,
        inner.height,
        natural.height.max(props.min_height),
        props.align_y,
    );

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn place_axis(origin: u16, extent: u16, natural: u16, align: Option<f64>) -> (u16, u16) {
    match align {
        None => (origin, extent),
        Some(fraction) => {
            let size = natural.min(extent);
            let free = extent - size;
            let fraction = fraction.clamp(0.0, 1.0);
            let offset = (free as f64 * fraction).round() as u16;
            (origin + offset, size)
        }
    }
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let error_paragraph = Paragraph::new(error_msg)
        .block(Block::bordered().title("ERROR"))
        .alignment(Alignment::Center);

    frame.render_widget(error_paragraph, area);
}
