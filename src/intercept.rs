use crate::pattern::BasePattern;

/// The anchor closest to a click target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    /// The raw `href` attribute.
    pub href: Option<String>,
    /// The `target` attribute, e.g. `_blank`.
    pub target: Option<String>,
    /// The host the link resolves to.
    pub host: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, host: impl Into<String>) -> Self {
        Anchor {
            href: Some(href.into()),
            target: None,
            host: host.into(),
        }
    }
}

/// A document click, reduced to what link interception inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickEvent {
    pub anchor: Option<Anchor>,
    pub ctrl_key: bool,
    pub meta_key: bool,
    pub alt_key: bool,
    pub shift_key: bool,
    /// Zero for the primary button.
    pub button: i16,
    pub default_prevented: bool,
}

impl ClickEvent {
    /// A plain primary-button click on an anchor.
    pub fn on(anchor: Anchor) -> Self {
        ClickEvent {
            anchor: Some(anchor),
            ..ClickEvent::default()
        }
    }
}

/// Decides whether a click should be turned into a client-side navigation,
/// returning the `href` to route to.
///
/// Modified clicks, non-primary buttons, already handled events, anchors
/// without an `href`, anchors aimed at another frame, cross-origin links and
/// same-page hash links are left to the browser.
pub fn intercept<'e>(
    event: &'e ClickEvent,
    base: &str,
    base_pattern: &BasePattern,
    host: &str,
) -> Option<&'e str> {
    if event.ctrl_key
        || event.meta_key
        || event.alt_key
        || event.shift_key
        || event.button != 0
        || event.default_prevented
    {
        return None;
    }

    let anchor = event.anchor.as_ref()?;
    let href = anchor.href.as_deref().filter(|href| !href.is_empty())?;

    if anchor.target.as_deref().is_some_and(|t| !t.is_empty())
        || anchor.host != host
        || href.starts_with('#')
    {
        return None;
    }

    if !href.starts_with(base) || base_pattern.is_match(href) {
        Some(href)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(event: &ClickEvent) -> Option<&str> {
        let base = BasePattern::new("/").unwrap();
        intercept(event, "/", &base, "example.com")
    }

    #[test]
    fn plain_click() {
        let event = ClickEvent::on(Anchor::new("/tasks", "example.com"));
        assert_eq!(check(&event), Some("/tasks"));
    }

    #[test]
    fn ignored_clicks() {
        let link = Anchor::new("/tasks", "example.com");

        let mut modified = ClickEvent::on(link.clone());
        modified.meta_key = true;
        assert_eq!(check(&modified), None);

        let mut middle = ClickEvent::on(link.clone());
        middle.button = 1;
        assert_eq!(check(&middle), None);

        let mut framed = link.clone();
        framed.target = Some("_blank".into());
        assert_eq!(check(&ClickEvent::on(framed)), None);

        let foreign = Anchor::new("https://other.org/x", "other.org");
        assert_eq!(check(&ClickEvent::on(foreign)), None);

        let hash = Anchor::new("#section", "example.com");
        assert_eq!(check(&ClickEvent::on(hash)), None);

        let bare = Anchor {
            href: None,
            ..link
        };
        assert_eq!(check(&ClickEvent::on(bare)), None);

        assert_eq!(check(&ClickEvent::default()), None);
    }
}
