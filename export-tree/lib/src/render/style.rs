use owo_colors::{OwoColorize, Style};

/// Applies the tree's color scheme, or passes text through when disabled.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.enabled {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn directory(&self, text: &str) -> String {
        self.paint(text, Style::new().blue())
    }

    pub fn file(&self, text: &str) -> String {
        self.paint(text, Style::new().green())
    }

    /// Symlinks, sockets and anything else that is neither file nor directory.
    pub fn other(&self, text: &str) -> String {
        self.paint(text, Style::new().dimmed())
    }

    pub fn label(&self, text: &str) -> String {
        self.paint(text, Style::new().yellow())
    }

    pub fn export(&self, text: &str) -> String {
        self.paint(text, Style::new().cyan())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, Style::new().red())
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, Style::new().bold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_palette_is_plain() {
        let palette = Palette::new(false);
        assert_eq!(palette.directory("src"), "src");
        assert_eq!(palette.export("└── main"), "└── main");
    }

    #[test]
    fn enabled_palette_emits_escapes() {
        let palette = Palette::new(true);
        let painted = palette.file("index.ts");
        assert!(painted.contains("\x1b["));
        assert!(painted.contains("index.ts"));
    }
}
