fn main() {
    tgfetch::cli::run();
}
