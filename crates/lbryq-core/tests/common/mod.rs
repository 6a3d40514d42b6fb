pub mod rpc_server;
