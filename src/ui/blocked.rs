/// Placeholder page shown in place of a blocked site

use yew::prelude::*;

#[function_component(BlockedPage)]
pub fn blocked_page() -> Html {
    html! {
        <div class="blocked-container">
            <i class="fas fa-ban blocked-icon"></i>
            <h1 class="main-title">{"Stay focused"}</h1>
            <p class="message-text">{"This site is blocked while a focus mode is on."}</p>
            <p class="empty-state-hint">{"Turn focus mode off from the toolbar to get back to it."}</p>
        </div>
    }
}
