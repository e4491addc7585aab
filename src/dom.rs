use cube_core::backing_size;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub const MESSAGE_ID: &str = "webgpumessage";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Whether the browser exposes `navigator.gpu` at all.
pub fn webgpu_available() -> bool {
    web::window()
        .map(|w| js_sys::Reflect::has(&w.navigator(), &JsValue::from_str("gpu")).unwrap_or(false))
        .unwrap_or(false)
}

/// Create a canvas filling `container`, sized for `width` x `height` CSS pixels.
pub fn attach_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
    width: u32,
    height: u32,
) -> anyhow::Result<(web::HtmlCanvasElement, (u32, u32))> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let style = canvas.style();
    _ = style.set_property("display", "block");
    _ = style.set_property("width", "100%");
    _ = style.set_property("height", "100%");
    let pixels = set_backing_size(&canvas, width, height);
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok((canvas, pixels))
}

/// Size the canvas backing store for `width` x `height` CSS pixels at the
/// current device pixel ratio. Returns the backing size in device pixels.
pub fn set_backing_size(canvas: &web::HtmlCanvasElement, width: u32, height: u32) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let (w_px, h_px) = backing_size(width, height, dpr);
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    (w_px, h_px)
}

/// Put a styled notice into `container` in place of the scene.
pub fn show_message(document: &web::Document, container: &web::HtmlElement, text: &str) {
    let Ok(el) = document.create_element("div") else {
        return;
    };
    el.set_id(MESSAGE_ID);
    el.set_text_content(Some(text));
    if let Ok(div) = el.dyn_into::<web::HtmlElement>() {
        let style = div.style();
        for (key, value) in [
            ("font-family", "monospace"),
            ("font-size", "13px"),
            ("text-align", "center"),
            ("background", "#fff"),
            ("color", "#000"),
            ("padding", "1.5em"),
            ("width", "400px"),
            ("margin", "5em auto 0"),
        ] {
            _ = style.set_property(key, value);
        }
        _ = container.append_child(&div);
    }
}
