use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAudioElement};

use crate::controller::Feedback;
use crate::grid::Coord;
use crate::session::Completion;

const COMPLETION_NOTICE: &str = "Congratulations! You completed the puzzle!";

/// Page audio cues plus the completion notice.
pub(crate) struct AudioFeedback {
    new_game: Option<HtmlAudioElement>,
    correct: Option<HtmlAudioElement>,
    notice_delay_ms: u32,
}

impl AudioFeedback {
    pub(crate) fn from_document(doc: &Document, notice_delay_ms: u32) -> Self {
        let audio = |id: &str| {
            doc.get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
        };
        Self {
            new_game: audio("newGameSound"),
            correct: audio("correctSound"),
            notice_delay_ms,
        }
    }
}

// Rewind so rapid repeats restart the clip. Playback errors never reach the game.
fn play(cue: Option<&HtmlAudioElement>, name: &str) {
    let Some(el) = cue else {
        return;
    };
    el.set_current_time(0.0);
    if let Err(err) = el.play() {
        gloo::console::warn!("puzzle: audio cue failed", name, err);
    }
}

impl Feedback for AudioFeedback {
    fn new_game(&mut self) {
        play(self.new_game.as_ref(), "newGameSound");
    }

    fn correct_placement(&mut self, _coord: Coord) {
        play(self.correct.as_ref(), "correctSound");
    }

    fn completed(&mut self, completion: Completion) {
        gloo::console::log!("puzzle: completed in seconds", completion.elapsed_secs);
        // Delay so the final tile is drawn before the modal blocks the page.
        Timeout::new(self.notice_delay_ms, || gloo::dialogs::alert(COMPLETION_NOTICE)).forget();
    }
}
