/*!
 * IPC Module
 * The shared bounded buffer processes communicate through
 */

mod buffer;

pub use buffer::SharedBuffer;
