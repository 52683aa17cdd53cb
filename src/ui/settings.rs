/// Settings page: edit one mode's site list and name

use crate::bridge;
use crate::error::FocusError;
use crate::mode::SiteList;
use crate::operations::{remove_mode, rename_mode, save_mode};
use crate::storage::{ACTIVE_MODE_KEY, CUSTOM_MODES_KEY};
use crate::ui::components::SiteChip;
use crate::ui::dom;
use patternfly_yew::prelude::*;
use url::Url;
use url::form_urlencoded;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub const SETTINGS_PAGE: &str = "settings.html";
pub const MODE_PARAM: &str = "mode";

fn mode_query(name: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(MODE_PARAM, name)
        .finish()
}

/// Extension-relative address of the settings page for a mode
pub fn settings_url(name: &str) -> String {
    format!("{}?{}", SETTINGS_PAGE, mode_query(name))
}

/// The mode named in a settings page address, if any
pub fn mode_from_url(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == MODE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|name| !name.is_empty())
}

/// Where the title field is in its edit cycle
#[derive(Debug, Clone, Copy, PartialEq)]
enum TitleEdit {
    Idle,
    Editing,
    Saving,
}

fn page_title(name: &str) -> String {
    format!("Focus Mode — {}", name)
}

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let mode_name = use_state(|| dom::location_href().as_deref().and_then(mode_from_url));
    let sites = use_state(SiteList::default);
    let site_input = use_state(String::new);
    let show_warning = use_state(|| false);
    let editing_title = use_state(|| false);
    let title_input = use_state(String::new);
    let title_edit = use_mut_ref(|| TitleEdit::Idle);
    let title_ref = use_node_ref();
    let error = use_state(|| None::<String>);

    // Load the mode's sites on mount, or abort without a mode name
    {
        let mode_name = (*mode_name).clone();
        let sites = sites.clone();
        let error = error.clone();

        use_effect_with((), move |_| {
            match mode_name {
                None => dom::alert(&FocusError::NoModeSelected.to_string()),
                Some(name) => {
                    dom::set_document_title(&page_title(&name));
                    spawn_local(async move {
                        match bridge::load(&[name.as_str()]).await {
                            Ok(snapshot) => sites.set(SiteList::new(snapshot.mode_sites(&name))),
                            Err(e) => error.set(Some(format!("Failed to load: {}", e))),
                        }
                    });
                }
            }
            || ()
        });
    }

    // Focus and select the title field when editing starts
    {
        let title_ref = title_ref.clone();
        use_effect_with(*editing_title, move |editing| {
            if *editing {
                if let Some(input) = title_ref.cast::<HtmlInputElement>() {
                    let _ = input.focus();
                    input.select();
                }
            }
            || ()
        });
    }

    let Some(name) = (*mode_name).clone() else {
        return html! {};
    };

    let on_site_input = {
        let site_input = site_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                site_input.set(input.value());
            }
        })
    };

    let add_site = {
        let sites = sites.clone();
        let site_input = site_input.clone();
        let show_warning = show_warning.clone();

        Callback::from(move |_: ()| {
            let mut updated = (*sites).clone();
            match updated.add(&site_input) {
                Ok(_) => {
                    sites.set(updated);
                    site_input.set(String::new());
                    show_warning.set(false);
                }
                Err(_) => show_warning.set(true),
            }
        })
    };

    let on_site_keydown = {
        let add_site = add_site.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                add_site.emit(());
            }
        })
    };

    let on_remove_site = {
        let sites = sites.clone();
        Callback::from(move |index: usize| {
            let mut updated = (*sites).clone();
            updated.remove(index);
            sites.set(updated);
        })
    };

    let on_save = {
        let name = name.clone();
        let sites = sites.clone();
        let error = error.clone();

        Callback::from(move |_| {
            let name = name.clone();
            let sites = (*sites).clone();
            let error = error.clone();

            spawn_local(async move {
                match save(&name, &sites).await {
                    Ok(()) => {
                        dom::alert("Focus mode settings saved!");
                        dom::close_window();
                    }
                    Err(e) => error.set(Some(format!("Failed to save: {}", e))),
                }
            });
        })
    };

    let on_remove_mode = {
        let name = name.clone();
        let error = error.clone();

        Callback::from(move |_| {
            let name = name.clone();
            let error = error.clone();

            spawn_local(async move {
                match remove(&name).await {
                    Ok(()) => {
                        dom::alert(&format!("Focus mode \"{}\" removed.", name));
                        dom::close_window();
                    }
                    Err(e) => error.set(Some(format!("Failed to remove: {}", e))),
                }
            });
        })
    };

    let on_start_edit = {
        let name = name.clone();
        let editing_title = editing_title.clone();
        let title_input = title_input.clone();
        let title_edit = title_edit.clone();

        Callback::from(move |_: MouseEvent| {
            *title_edit.borrow_mut() = TitleEdit::Editing;
            title_input.set(name.clone());
            editing_title.set(true);
        })
    };

    let on_title_input = {
        let title_input = title_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                title_input.set(input.value());
            }
        })
    };

    let commit_title = {
        let name = name.clone();
        let mode_name = mode_name.clone();
        let sites = sites.clone();
        let editing_title = editing_title.clone();
        let title_input = title_input.clone();
        let title_edit = title_edit.clone();
        let title_ref = title_ref.clone();

        // Enter and blur can both fire; only the first commit of an edit runs
        Callback::from(move |_: ()| {
            if *title_edit.borrow() != TitleEdit::Editing {
                return;
            }
            *title_edit.borrow_mut() = TitleEdit::Saving;

            let old = name.clone();
            let raw = (*title_input).clone();
            let sites = (*sites).clone();
            let mode_name = mode_name.clone();
            let editing_title = editing_title.clone();
            let title_edit = title_edit.clone();
            let title_ref = title_ref.clone();

            spawn_local(async move {
                let next = match rename(&old, &raw, &sites).await {
                    Ok(Some(new)) => {
                        dom::set_document_title(&page_title(&new));
                        dom::replace_history(&format!("?{}", mode_query(&new)));
                        mode_name.set(Some(new));
                        TitleEdit::Idle
                    }
                    Ok(None) | Err(FocusError::EmptyName) => TitleEdit::Idle,
                    Err(e @ FocusError::DuplicateName(_)) => {
                        dom::alert(&e.to_string());
                        TitleEdit::Editing
                    }
                    Err(e) => {
                        dom::alert(&e.to_string());
                        TitleEdit::Idle
                    }
                };

                *title_edit.borrow_mut() = next;
                if next == TitleEdit::Editing {
                    if let Some(input) = title_ref.cast::<HtmlInputElement>() {
                        let _ = input.focus();
                    }
                } else {
                    editing_title.set(false);
                }
            });
        })
    };

    let on_title_keydown = {
        let commit_title = commit_title.clone();
        let editing_title = editing_title.clone();
        let title_edit = title_edit.clone();
        Callback::from(move |e: KeyboardEvent| match e.key().as_str() {
            "Enter" => commit_title.emit(()),
            "Escape" => {
                *title_edit.borrow_mut() = TitleEdit::Idle;
                editing_title.set(false);
            }
            _ => {}
        })
    };

    let on_title_blur = commit_title.reform(|_: FocusEvent| ());

    html! {
        <div class="container">
            <div class="header">
                if *editing_title {
                    <input
                        ref={title_ref}
                        id="titleInput"
                        type="text"
                        class="title-input"
                        value={(*title_input).clone()}
                        oninput={on_title_input}
                        onkeydown={on_title_keydown}
                        onblur={on_title_blur}
                    />
                } else {
                    <h1 id="profileTitle" class="main-title">{&name}</h1>
                    <button id="editTitleBtn" class="edit-title" title="Rename" onclick={on_start_edit}>
                        {"✏️"}
                    </button>
                }
            </div>

            if let Some(err) = (*error).clone() {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err}
                </Alert>
            }

            <div class="site-input-row">
                <input
                    id="siteInput"
                    type="text"
                    placeholder="Add a site to block (e.g., youtube.com)"
                    value={(*site_input).clone()}
                    oninput={on_site_input}
                    onkeydown={on_site_keydown}
                    class="search-input"
                />
                <Button onclick={add_site.reform(|_| ())} variant={ButtonVariant::Secondary}>
                    {"Add to list"}
                </Button>
            </div>

            if *show_warning {
                <Alert r#type={AlertType::Warning} title={"Please enter a valid domain, like youtube.com"} inline={true}>
                </Alert>
            }

            if sites.is_empty() {
                <div id="emptyState" class="empty-state">
                    <p>{"No sites yet."}</p>
                    <p class="empty-state-hint">{"Add the sites this mode should block."}</p>
                </div>
            } else {
                <ul id="siteList" class="site-list">
                    {for sites.as_slice().iter().enumerate().map(|(index, site)| html! {
                        <SiteChip
                            key={site.clone()}
                            site={site.clone()}
                            on_remove={on_remove_site.reform(move |_| index)}
                        />
                    })}
                </ul>
            }

            <div class="footer">
                <Button onclick={on_save} variant={ButtonVariant::Primary}>
                    {"Save"}
                </Button>
                <Button onclick={on_remove_mode} variant={ButtonVariant::Danger}>
                    {"Remove mode"}
                </Button>
            </div>
        </div>
    }
}

// Helper functions

async fn save(name: &str, sites: &SiteList) -> Result<(), FocusError> {
    let snapshot = bridge::load(&[CUSTOM_MODES_KEY]).await?;
    bridge::apply(&save_mode(&snapshot, name, sites)?).await
}

async fn remove(name: &str) -> Result<(), FocusError> {
    let snapshot = bridge::load(&[CUSTOM_MODES_KEY, ACTIVE_MODE_KEY]).await?;
    bridge::commit(&remove_mode(&snapshot, name)?).await
}

/// Rename and return the new name, or `None` when nothing changed
async fn rename(old: &str, raw: &str, sites: &SiteList) -> Result<Option<String>, FocusError> {
    let snapshot = bridge::load(&[CUSTOM_MODES_KEY, ACTIVE_MODE_KEY, old]).await?;

    match rename_mode(&snapshot, old, raw, sites)? {
        Some((new, change)) => {
            bridge::commit(&change).await?;
            Ok(Some(new))
        }
        None => Ok(None),
    }
}
