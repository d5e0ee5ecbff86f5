// PATHFAN distributes an enumerable unit of work across a fixed pool of
// worker processes reachable over TCP and folds the partial answers back
// into one result.
//
// Two kinds of work are supported: enumerating every simple path between
// two nodes of a graph, and computing the dot products that make up a
// matrix multiplication. Both ride the same wire protocol: one
// length-prefixed, rkyv-encoded unit per connection, one framed reply on
// the same connection.
//
// The client side carves the problem into independent units (one induced
// subgraph per first hop, or one row/column pair per output cell), assigns
// them round-robin across the endpoint pool, and merges completions in
// whatever order they land. Workers are a sequential accept loop that
// services exactly one connection at a time. A failed unit contributes
// nothing; nothing is retried.

pub mod dispatch;
pub mod graph;
pub mod matrix;
pub mod net;
pub mod worker;
