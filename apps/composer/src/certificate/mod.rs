// Certificate composition: maps a certificate record onto layout sections and
// runs the layout pipeline over them.
// compose_certificate is CPU-bound; handlers call it through spawn_blocking.

pub mod generator;
pub mod handlers;
pub mod sections;
