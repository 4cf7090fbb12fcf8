//! Bootstrap-compatible markup for a whole group

use crate::content::escape_html;
use crate::group::PanelGroup;

impl PanelGroup {
    /// Markup of the navigation strip and all panes, ready to be placed
    /// inside the group's container element
    pub fn render_markup(&self) -> String {
        let controls = self.control_attributes();
        let panes = self.pane_attributes();

        let mut out = String::from(r#"<div class="tab-manager-container">"#);
        out.push_str(&format!(
            r#"<ul class="nav {}" role="tablist">"#,
            escape_html(&self.nav_class())
        ));

        for (panel, control) in self.tabs().iter().zip(&controls) {
            out.push_str(r#"<li class="nav-item" role="presentation">"#);
            out.push_str(&format!(
                r##"<button class="{}" id="{}" data-bs-toggle="tab" data-bs-target="#{}" type="button" role="{}" aria-controls="{}" aria-selected="{}" tabindex="{}"{}>"##,
                control.class,
                escape_html(&control.id),
                escape_html(&panel.id),
                control.role,
                escape_html(&control.aria_controls),
                control.aria_selected,
                control.tabindex,
                if control.disabled { r#" disabled="disabled""# } else { "" },
            ));
            out.push_str(&panel.title_markup());
            out.push_str("</button></li>");
        }
        out.push_str("</ul>");

        out.push_str(r#"<div class="tab-content">"#);
        for (panel, pane) in self.tabs().iter().zip(&panes) {
            out.push_str(&format!(
                r#"<div class="{}" id="{}" role="{}" aria-labelledby="{}" tabindex="{}">"#,
                pane.class,
                escape_html(&pane.id),
                pane.role,
                escape_html(&pane.aria_labelledby),
                pane.tabindex,
            ));
            out.push_str(&panel.content.to_markup(&panel.id));
            out.push_str("</div>");
        }
        out.push_str("</div></div>");

        out
    }
}
