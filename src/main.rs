fn main() {
    dioxus::launch(kbchat::ui::App);
}
