fn main() {
    ffcookies::cli::run();
}
