use leptos::prelude::*;
use log::error;

use crate::api::LogKind;
use crate::error::SessionResult;
use crate::reconcile::Transition;

/// One message for the notification strip.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
	pub kind: LogKind,
	pub text: String,
}

impl Notice {
	/// Every error shown to the user is also written to the console.
	pub fn error(err: impl ToString) -> Self {
		let text = err.to_string();
		error!("{text}");
		Self {
			kind: LogKind::Error,
			text,
		}
	}

	/// Ignored actions stay silent; everything else is worth telling the user.
	pub fn from_result(result: &SessionResult<Transition>) -> Option<Self> {
		match result {
			Ok(Transition::Applied(text)) => Some(Self {
				kind: LogKind::Success,
				text: text.clone(),
			}),
			Ok(Transition::Ignored(_)) => None,
			Err(e) => Some(Self::error(e)),
		}
	}
}

#[component]
pub fn Toast(#[prop(into)] notice: Signal<Option<Notice>>, on_dismiss: Callback<()>) -> impl IntoView {
	move || {
		notice.get().map(|n| {
			view! {
				<div class=format!("toast {}", n.kind.css_class()) role="status">
					<span>{n.text}</span>
					<button class="link" on:click=move |_| on_dismiss.run(())>"×"</button>
				</div>
			}
		})
	}
}
