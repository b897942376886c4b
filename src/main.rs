//! Browser entry point; mounts the app onto `<body>`.

use leptos::prelude::*;
use star_route_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App)
}
