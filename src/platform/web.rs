//! Browser glue: images, DOM panels, timers

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlElement, HtmlImageElement};

use crate::assets::{AssetError, FallbackUrls, fallback};

fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml,{}", String::from(js_sys::encode_uri_component(svg)))
}

/// Embedded sprites as data URLs
pub fn fallback_urls() -> FallbackUrls {
    FallbackUrls {
        ship: svg_data_url(fallback::SHIP),
        hook: svg_data_url(fallback::HOOK),
        fish: fallback::FISH.iter().map(|s| svg_data_url(s)).collect(),
        trash: fallback::TRASH.iter().map(|s| svg_data_url(s)).collect(),
    }
}

/// Load and decode an image; resolves once `onload` or `onerror` fires
pub async fn load_image(url: String) -> Result<HtmlImageElement, AssetError> {
    let image = HtmlImageElement::new().map_err(|e| AssetError::Platform(format!("{e:?}")))?;
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(&url);

    let outcome = JsFuture::from(promise).await;
    image.set_onload(None);
    image.set_onerror(None);
    match outcome {
        Ok(_) => Ok(image),
        Err(_) => Err(AssetError::NotFound { url }),
    }
}

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn element(id: &str) -> Option<HtmlElement> {
    document()?.get_element_by_id(id)?.dyn_into().ok()
}

/// Toggle the `hidden` class on an element
pub fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = element(id) {
        let _ = el.class_list().toggle_with_force("hidden", hidden);
    }
}

/// Toggle the `show` class on an element
pub fn set_shown(id: &str, shown: bool) {
    if let Some(el) = element(id) {
        let _ = el.class_list().toggle_with_force("show", shown);
    }
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

/// Loading bar width and caption
pub fn set_progress(percent: f32, caption: &str) {
    if let Some(bar) = element("progressBar") {
        let _ = bar.style().set_property("width", &format!("{percent}%"));
    }
    set_text("loadingInfo", caption);
}

/// Run `f` once after `ms` milliseconds
pub fn set_timeout(ms: i32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(f);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        ms,
    );
    closure.forget();
}

/// Blocking message box for the rare case the player must be told something
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Register `handler` for a click on element `id`
pub fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
    let Some(el) = element(id) else {
        log::debug!("No #{id} element");
        return;
    };
    let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
