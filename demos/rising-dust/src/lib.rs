use wasm_bindgen::prelude::*;

mod field;

glyphwave_web::export_field!(crate::field::rising_dust(), "rising-dust");
