use bukurs_profile::export::ExportTypeSelector;
use bukurs_profile::import::{ApplyReport, MergeSelection, ValidationResult};
use bukurs_profile::models::{Category, Profile};
use owo_colors::OwoColorize;

/// Colors for terminal output, or none with `--nc`
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn ok(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().bright_blue().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

pub trait Colorize {
    fn render(&self, palette: &Palette) -> String;
}

/// Checkbox padded to `width` before coloring, so escapes don't count as columns
fn check(palette: &Palette, on: bool, width: usize) -> String {
    if on {
        palette.ok(&format!("{:<width$}", "[x]"))
    } else {
        palette.dim(&format!("{:<width$}", "[ ]"))
    }
}

pub struct ColorizeSelector<'a>(pub &'a ExportTypeSelector);

impl<'a> Colorize for ColorizeSelector<'a> {
    fn render(&self, palette: &Palette) -> String {
        let mut s = format!("{}\n", palette.heading("Export categories"));
        for category in Category::ALL {
            let state = self.0.toggle_state(category);
            let mut line = format!("  {} {}", check(palette, state.is_checked(), 0), category.label());
            if state.locked {
                line.push_str(&palette.dim(" (locked)"));
            }
            s.push_str(&line);
            s.push('\n');
        }
        s
    }
}

pub struct ColorizeValidation<'a>(pub &'a ValidationResult);

impl<'a> Colorize for ColorizeValidation<'a> {
    fn render(&self, palette: &Palette) -> String {
        let status = &self.0.status;
        let mut s = format!(
            "{} {} accepted, {} error(s), {} critical\n",
            palette.heading("Validation:"),
            palette.ok(&status.success.to_string()),
            palette.warn(&status.error.to_string()),
            palette.error(&status.critical_error.to_string()),
        );
        for message in &status.messages {
            s.push_str(&format!("  {} {}\n", palette.warn("!"), message));
        }
        s
    }
}

pub struct ColorizeSelection<'a>(pub &'a MergeSelection);

impl<'a> Colorize for ColorizeSelection<'a> {
    fn render(&self, palette: &Palette) -> String {
        let mut s = format!("{}\n", palette.heading("Import destinations"));
        s.push_str(&format!(
            "  {} {} {}\n",
            palette.dim(&format!("{:<28}", "category")),
            palette.dim(&format!("{:<8}", "current")),
            palette.dim("new")
        ));
        for (category, toggle) in self.0.entries() {
            s.push_str(&format!(
                "  {:<28} {} {}\n",
                category.label(),
                check(palette, toggle.apply_to_current, 8),
                check(palette, toggle.apply_to_new, 0)
            ));
        }
        s
    }
}

pub struct ColorizeApplyReport<'a>(pub &'a ApplyReport);

impl<'a> Colorize for ColorizeApplyReport<'a> {
    fn render(&self, palette: &Palette) -> String {
        let applied: Vec<&str> = self.0.applied.iter().map(|c| c.label()).collect();
        let mut s = format!(
            "{} {}\n",
            palette.ok("Imported:"),
            applied.join(", ")
        );
        if self.0.bookmarks_imported > 0 {
            s.push_str(&format!(
                "  {} bookmark(s) added to the current profile\n",
                self.0.bookmarks_imported
            ));
        }
        for id in &self.0.created_profiles {
            s.push_str(&format!("  new profile {}\n", palette.dim(id)));
        }
        s
    }
}

pub struct ColorizeProfile<'a> {
    pub profile: &'a Profile,
    pub active: bool,
}

impl<'a> Colorize for ColorizeProfile<'a> {
    fn render(&self, palette: &Palette) -> String {
        let marker = if self.active { palette.ok("*") } else { " ".to_string() };
        format!(
            "{} {} {}\n{:>4}{} node(s), created {}\n",
            marker,
            palette.heading(&self.profile.name),
            palette.dim(&self.profile.id),
            "",
            self.profile.bookmark_count(),
            self.profile.creation_timestamp.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bukurs_profile::import::ValidationStatus;
    use bukurs_profile::models::{Environment, ExportDocument};
    use rstest::rstest;

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_palette_keeps_text(#[case] color: bool) {
        let palette = Palette::new(color);
        assert!(palette.ok("done").contains("done"));
        assert!(palette.warn("careful").contains("careful"));
        assert!(palette.error("failed").contains("failed"));
    }

    #[test]
    fn test_plain_palette_has_no_escapes() {
        let palette = Palette::new(false);
        assert_eq!(palette.heading("Title"), "Title");
        assert_eq!(palette.dim("id"), "id");
    }

    #[test]
    fn test_selector_marks_locked_categories() {
        let mut selector = ExportTypeSelector::new();
        selector.set_category(Category::AllProfiles, true);

        let rendered = ColorizeSelector(&selector).render(&Palette::new(false));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[1].starts_with("  [x]"));
        assert!(!lines[1].contains("(locked)"));
        assert!(lines[2].contains("(locked)"));
    }

    #[test]
    fn test_validation_lists_messages() {
        let result = ValidationResult {
            valid_object: ExportDocument::new(Environment::default()),
            status: ValidationStatus {
                success: 1,
                error: 1,
                critical_error: 0,
                messages: vec!["unknown entry 'x' ignored".to_string()],
            },
        };

        let rendered = ColorizeValidation(&result).render(&Palette::new(false));
        assert!(rendered.starts_with("Validation: 1 accepted, 1 error(s), 0 critical"));
        assert!(rendered.contains("unknown entry 'x' ignored"));
    }

    #[test]
    fn test_selection_rows_follow_entries() {
        let selection =
            MergeSelection::for_categories(&[Category::UserSettings, Category::AllProfiles]);

        let rendered = ColorizeSelection(&selection).render(&Palette::new(false));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains(Category::UserSettings.label()));
        assert!(lines[3].contains(Category::AllProfiles.label()));
    }

    fn strip_escapes(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                chars.by_ref().find(|&c| c == 'm');
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_selection_columns_align_with_color() {
        let selection =
            MergeSelection::for_categories(&[Category::CurrentBookmarks, Category::AllProfiles]);

        let plain = ColorizeSelection(&selection).render(&Palette::new(false));
        let colored = ColorizeSelection(&selection).render(&Palette::new(true));
        assert_ne!(plain, colored);
        assert_eq!(strip_escapes(&colored), plain);

        let new_column: Vec<usize> = plain
            .lines()
            .skip(1)
            .map(|l| l.rfind('[').unwrap_or(0))
            .collect();
        assert!(new_column[1..].iter().all(|&c| c == new_column[1]));
        assert_eq!(plain.lines().nth(1).unwrap().find("new"), Some(new_column[1]));
    }

    #[test]
    fn test_apply_report() {
        let report = ApplyReport {
            applied: vec![Category::CurrentBookmarks],
            created_profiles: vec!["abc".to_string()],
            bookmarks_imported: 3,
        };

        let rendered = ColorizeApplyReport(&report).render(&Palette::new(false));
        assert!(rendered.contains("3 bookmark(s)"));
        assert!(rendered.contains("new profile abc"));
    }

    #[test]
    fn test_profile_marks_active() {
        let profile = Profile::new("Work");
        let rendered = ColorizeProfile {
            profile: &profile,
            active: true,
        }
        .render(&Palette::new(false));

        assert!(rendered.starts_with("* Work"));
        assert!(rendered.contains("1 node(s)"));
    }
}
