/// Reusable UI components

use crate::mode::mode_icon;
use yew::prelude::*;

/// Favicon endpoints, tried in order until one loads
pub fn favicon_url(site: &str, attempt: usize) -> Option<String> {
    match attempt {
        0 => Some(format!("https://www.google.com/s2/favicons?domain={}&sz=128", site)),
        1 => Some(format!("https://icons.duckduckgo.com/ip3/{}.ico", site)),
        2 => Some(format!("https://logo.clearbit.com/{}", site)),
        _ => None,
    }
}

#[derive(Properties, PartialEq)]
pub struct SiteChipProps {
    pub site: String,
    pub on_remove: Callback<()>,
}

#[function_component(SiteChip)]
pub fn site_chip(props: &SiteChipProps) -> Html {
    let attempt = use_state(|| 0usize);
    let src = favicon_url(&props.site, *attempt).unwrap_or_default();

    let on_icon_error = {
        let attempt = attempt.clone();
        let site = props.site.clone();
        Callback::from(move |_: Event| {
            let next = *attempt + 1;
            if favicon_url(&site, next).is_some() {
                attempt.set(next);
            }
        })
    };

    let on_remove = props.on_remove.reform(|e: MouseEvent| {
        e.stop_propagation();
    });

    html! {
        <li class="site-chip blocked">
            <button
                class="remove-chip"
                aria-label={format!("Remove {}", props.site)}
                onclick={on_remove}
            >
                {"×"}
            </button>
            <div class="icon-wrap">
                <img alt={props.site.clone()} loading="lazy" src={src} onerror={on_icon_error} />
                <span class="blocked-overlay" title="Blocked"></span>
            </div>
            <span class="site-label">{&props.site}</span>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModeEntryProps {
    pub name: String,
    pub selected: bool,
    pub on_click: Callback<String>,
}

#[function_component(ModeEntry)]
pub fn mode_entry(props: &ModeEntryProps) -> Html {
    let onclick = {
        let name = props.name.clone();
        props.on_click.reform(move |_: MouseEvent| name.clone())
    };

    html! {
        <div class={classes!("mode-option", props.selected.then_some("selected"))} {onclick}>
            <i class={classes!("fas", mode_icon(&props.name))}></i>
            {" "}{&props.name}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favicon_fallback_order() {
        assert_eq!(
            favicon_url("youtube.com", 0).as_deref(),
            Some("https://www.google.com/s2/favicons?domain=youtube.com&sz=128")
        );
        assert_eq!(
            favicon_url("youtube.com", 1).as_deref(),
            Some("https://icons.duckduckgo.com/ip3/youtube.com.ico")
        );
        assert_eq!(
            favicon_url("youtube.com", 2).as_deref(),
            Some("https://logo.clearbit.com/youtube.com")
        );
        assert_eq!(favicon_url("youtube.com", 3), None);
    }
}
