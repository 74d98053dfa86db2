use yew::prelude::*;

/// What the popover shows: a label anchored at a screen position.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Properties, PartialEq, Clone)]
pub struct PopoverProps {
    pub label: Option<HoverLabel>,
}

#[function_component(Popover)]
pub fn popover(props: &PopoverProps) -> Html {
    let Some(label) = &props.label else {
        return html! { <div id="popover" style="display:none;"></div> };
    };
    let style = format!(
        "display:block; position:absolute; left:{}px; top:{}px; transform:translate(8px, -50%); \
         background:rgba(22,27,34,0.95); color:#c9d1d9; border:1px solid #30363d; border-radius:6px; \
         padding:4px 8px; font-size:13px; white-space:nowrap; pointer-events:none;",
        label.x, label.y
    );
    html! { <div id="popover" {style}>{ label.text.clone() }</div> }
}
