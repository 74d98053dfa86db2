use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::globe_view::GlobeView;
use crate::config::GlobeConfig;
use crate::loader::load_globe_data;
use crate::model::GlobeData;

enum Load {
    Loading,
    Ready(Rc<GlobeData>),
    Failed(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| GlobeConfig::from_document());
    let load = use_state(|| Load::Loading);

    // Load marker + land data once; any failure aborts initialization
    {
        let load = load.clone();
        let config = config.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_globe_data(&config).await {
                    Ok(data) => load.set(Load::Ready(Rc::new(data))),
                    Err(err) => {
                        log::error!("globe initialization failed: {err}");
                        load.set(Load::Failed(err.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let content = match &*load {
        Load::Loading => html! { <p class="status">{"Loading…"}</p> },
        Load::Ready(data) => html! { <GlobeView data={data.clone()} config={config.clone()} /> },
        Load::Failed(message) => html! {
            <p class="status error" style="color:#f85149;">{ format!("Could not load the globe: {message}") }</p>
        },
    };

    html! { <div id="root">{ content }</div> }
}
