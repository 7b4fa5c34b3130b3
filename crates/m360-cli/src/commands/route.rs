use colored::Colorize;
use m360_core::routes::Route;

pub fn run(path: &str) {
    let route = Route::resolve(path);
    if route == Route::Home && !path.trim_end_matches('/').is_empty() {
        println!("{} {} -> {}", "redirect".yellow(), path, route.path());
    }
    println!("{} {} (page: {})", route.path().bright_blue(), route, route.page_name());
}
