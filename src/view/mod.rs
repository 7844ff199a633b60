use std::io::ErrorKind;
use std::path::Path;
use std::{fs, io};

use spdlog::debug;

pub mod export_renderer;
pub mod login_renderer;

pub const LOGIN_TEMPLATE: &str = "login.tpl";
pub const EXPORT_TEMPLATE: &str = "export.tpl";

const BUILTIN_LOGIN: &str = include_str!("../../res/template/login.tpl");
const BUILTIN_EXPORT: &str = include_str!("../../res/template/export.tpl");

/// Template source from `template_dir`, or the built-in page when the
/// directory has no file with that name.
pub fn read_template(template_dir: Option<&Path>, name: &str) -> io::Result<String> {
    if let Some(dir) = template_dir {
        let path = dir.join(name);
        match fs::read_to_string(&path) {
            Ok(src) => {
                debug!("Using template {}", path.display());
                return Ok(src);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }

    match name {
        LOGIN_TEMPLATE => Ok(BUILTIN_LOGIN.to_string()),
        EXPORT_TEMPLATE => Ok(BUILTIN_EXPORT.to_string()),
        _ => Err(io::Error::new(ErrorKind::NotFound, format!("Unknown template {}", name))),
    }
}
