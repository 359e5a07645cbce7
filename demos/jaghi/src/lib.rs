use wasm_bindgen::prelude::*;

mod field;

glyphwave_web::export_field!(crate::field::jaghi(), "jaghi");
