use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

#[derive(ramhorns::Content)]
struct LoginPage<'a> {
    message: &'a str,
}

pub struct LoginRenderer<'a> {
    pub template: Template<'a>,
}

impl LoginRenderer<'_> {
    pub fn new(login_tpl_src: &str) -> io::Result<LoginRenderer> {
        let template = match Template::new(login_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing login template: {}", e)));
            }
        };

        Ok(LoginRenderer {
            template,
        })
    }

    /// An empty message renders no error block
    pub fn render(&self, message: &str) -> String {
        self.template.render(&LoginPage { message })
    }
}
