fn main() -> anyhow::Result<()> {
    mallet::game::run(std::env::args())
}
