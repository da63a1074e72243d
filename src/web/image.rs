//! Turns an uploaded file into a drawable `HtmlImageElement`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::file::ObjectUrl;
use wasm_bindgen::JsValue;
use web_sys::{File, HtmlImageElement};

use crate::error::DecodeError;
use crate::grid::SourceImage;

/// Decoded picture. Holds the object URL so it stays valid while drawn.
pub(crate) struct LoadedImage {
    element: HtmlImageElement,
    _url: ObjectUrl,
}

impl LoadedImage {
    pub(crate) fn element(&self) -> &HtmlImageElement {
        &self.element
    }

    pub(crate) fn source(&self) -> SourceImage {
        SourceImage {
            width: self.element.natural_width(),
            height: self.element.natural_height(),
        }
    }
}

type Done = Box<dyn FnOnce(Result<LoadedImage, DecodeError>)>;

struct Pending {
    element: HtmlImageElement,
    url: ObjectUrl,
    done: Done,
}

/// Starts decoding `file`; `done` runs exactly once with the result.
pub(crate) fn load_file(
    file: File,
    done: impl FnOnce(Result<LoadedImage, DecodeError>) + 'static,
) -> Result<(), JsValue> {
    let name = file.name();
    let url = ObjectUrl::from(gloo::file::File::from(file));
    let element = HtmlImageElement::new()?;
    let src = url.to_string();
    let pending = Rc::new(RefCell::new(Some(Pending {
        element: element.clone(),
        url,
        done: Box::new(done),
    })));

    let on_load = pending.clone();
    EventListener::once(&element, "load", move |_| {
        let Some(p) = on_load.borrow_mut().take() else {
            return;
        };
        let result = if p.element.natural_width() == 0 || p.element.natural_height() == 0 {
            Err(DecodeError::EmptyImage)
        } else {
            Ok(LoadedImage {
                element: p.element,
                _url: p.url,
            })
        };
        (p.done)(result);
    })
    .forget();

    let on_error = pending;
    EventListener::once(&element, "error", move |_| {
        if let Some(p) = on_error.borrow_mut().take() {
            (p.done)(Err(DecodeError::Unreadable(name)));
        }
    })
    .forget();

    element.set_src(&src);
    Ok(())
}
