mod act_fn;
mod softmax;

pub use act_fn::ActFn;
