use super::views::Panel;
use std::fmt;

/// Screen
///
/// A frame of the two-pane layout: the sidebar on the left, the content pane on the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub sidebar: Vec<SidebarEntry>,
    pub content: Content,
}

/// One module row. `children` is only populated for the expanded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub id: i32,
    pub title: String,
    pub icon: String,
    pub expanded: bool,
    pub children: Vec<SidebarLeaf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarLeaf {
    pub id: i32,
    pub title: String,
    pub icon: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Menu loaded, nothing selected.
    Welcome,
    Loading,
    Failed { message: String },
    /// A registered view, keyed by the submodule's machine name.
    View { submodule: String, panel: Panel },
    Placeholder(Panel),
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Menu ==")?;
        if self.sidebar.is_empty() {
            writeln!(f, "  (no modules)")?;
        }
        for entry in &self.sidebar {
            let marker = if entry.expanded { 'v' } else { '>' };
            writeln!(
                f,
                "{} [{}] {} ({})",
                marker, entry.id, entry.title, entry.icon
            )?;
            for leaf in &entry.children {
                let marker = if leaf.selected { '*' } else { '-' };
                writeln!(f, "    {} [{}] {} ({})", marker, leaf.id, leaf.title, leaf.icon)?;
            }
        }

        writeln!(f)?;
        match &self.content {
            Content::Welcome => writeln!(f, "Welcome. Pick a module from the menu."),
            Content::Loading => writeln!(f, "Loading menu..."),
            Content::Failed { message } => writeln!(f, "Could not load the menu: {}", message),
            Content::View { panel, .. } | Content::Placeholder(panel) => {
                writeln!(f, "== {} ==", panel.title)?;
                for line in &panel.body {
                    writeln!(f, "{}", line)?;
                }
                Ok(())
            }
        }
    }
}
