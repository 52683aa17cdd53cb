/// Popup UI: pick a focus mode, turn it on or off, create new modes

use crate::bridge;
use crate::error::FocusError;
use crate::mode::ModeRegistry;
use crate::operations::{activate_mode, create_mode, deactivate};
use crate::storage::{ACTIVE_MODE_KEY, CUSTOM_MODES_KEY};
use crate::ui::components::ModeEntry;
use crate::ui::dom;
use crate::ui::settings::settings_url;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let registry = use_state(ModeRegistry::default);
    let active_mode = use_state(|| None::<String>);
    // Mode whose actions are showing; only one at a time
    let selected_mode = use_state(|| None::<String>);
    let error = use_state(|| None::<String>);

    // Load modes on mount
    {
        let registry = registry.clone();
        let active_mode = active_mode.clone();
        let error = error.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match bridge::load(&[CUSTOM_MODES_KEY, ACTIVE_MODE_KEY]).await {
                    Ok(snapshot) => {
                        registry.set(snapshot.registry());
                        active_mode.set(snapshot.active_mode());
                    }
                    Err(e) => {
                        error.set(Some(format!("Failed to load modes: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    let on_mode_click = {
        let selected_mode = selected_mode.clone();
        Callback::from(move |name: String| {
            selected_mode.set(Some(name));
        })
    };

    let on_open_settings = {
        let selected_mode = selected_mode.clone();
        let error = error.clone();

        Callback::from(move |_| {
            let Some(name) = (*selected_mode).clone() else {
                return;
            };
            let error = error.clone();
            spawn_local(async move {
                if let Err(e) = bridge::open_tab(&settings_url(&name)).await {
                    error.set(Some(e.to_string()));
                }
            });
        })
    };

    let on_turn_on = {
        let selected_mode = selected_mode.clone();
        let active_mode = active_mode.clone();
        let error = error.clone();

        Callback::from(move |_| {
            let Some(name) = (*selected_mode).clone() else {
                return;
            };
            let selected_mode = selected_mode.clone();
            let active_mode = active_mode.clone();
            let error = error.clone();

            spawn_local(async move {
                match bridge::commit(&activate_mode(&name)).await {
                    Ok(()) => {
                        active_mode.set(Some(name));
                        selected_mode.set(None);
                    }
                    Err(e) => {
                        error.set(Some(format!("Failed to turn on: {}", e)));
                    }
                }
            });
        })
    };

    let on_turn_off = {
        let selected_mode = selected_mode.clone();
        let active_mode = active_mode.clone();
        let error = error.clone();

        Callback::from(move |_| {
            let selected_mode = selected_mode.clone();
            let active_mode = active_mode.clone();
            let error = error.clone();

            spawn_local(async move {
                match bridge::commit(&deactivate()).await {
                    Ok(()) => {
                        active_mode.set(None);
                        selected_mode.set(None);
                    }
                    Err(e) => {
                        error.set(Some(format!("Failed to turn off: {}", e)));
                    }
                }
            });
        })
    };

    let on_create = {
        let registry = registry.clone();
        let error = error.clone();

        Callback::from(move |_| {
            let Some(raw) = dom::prompt("Enter a name for your new focus mode:") else {
                return;
            };
            let registry = registry.clone();
            let error = error.clone();

            spawn_local(async move {
                if let Err(e) = create_and_open(&raw, registry).await {
                    error.set(Some(format!("Failed to create mode: {}", e)));
                }
            });
        })
    };

    let action_area = html! {
        <div id="modeOptions" class="mode-actions">
            <Button onclick={on_open_settings} variant={ButtonVariant::Link}>
                {"Settings"}
            </Button>
            <Button onclick={on_turn_on} variant={ButtonVariant::Primary}>
                {"Turn on"}
            </Button>
            <Button onclick={on_turn_off} variant={ButtonVariant::Secondary}>
                {"Turn off"}
            </Button>
        </div>
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Focusly"}</h1>

            if let Some(err) = (*error).clone() {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err}
                </Alert>
            }

            <div id="modeList" class="mode-list">
                {for registry.names().map(|name| {
                    let is_active = active_mode.as_deref() == Some(name);
                    let shows_actions = selected_mode.as_deref() == Some(name);
                    html! {
                        <>
                            <ModeEntry
                                name={name.to_string()}
                                selected={is_active}
                                on_click={on_mode_click.clone()}
                            />
                            if shows_actions {
                                {action_area.clone()}
                            }
                        </>
                    }
                })}

                <Button onclick={on_create} variant={ButtonVariant::Secondary} block={true}>
                    <i class="fas fa-plus"></i>{" Create New Focus Mode"}
                </Button>
            </div>
        </div>
    }
}

// Helper functions

/// Register the mode if it is new, then open its settings page
async fn create_and_open(raw: &str, registry: UseStateHandle<ModeRegistry>) -> Result<(), FocusError> {
    let snapshot = bridge::load(&[CUSTOM_MODES_KEY]).await?;

    let (name, patch) = match create_mode(&snapshot, raw) {
        Ok(created) => created,
        Err(FocusError::EmptyName) => return Ok(()),
        Err(e) => return Err(e),
    };

    if !patch.is_empty() {
        bridge::apply(&patch).await?;
        let mut updated = snapshot;
        updated.apply(&patch);
        registry.set(updated.registry());
    }

    bridge::open_tab(&settings_url(&name)).await
}
